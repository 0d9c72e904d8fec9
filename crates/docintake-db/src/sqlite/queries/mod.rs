mod submissions;
