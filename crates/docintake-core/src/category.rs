use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// One of the twelve fixed classes of paperwork a company submits.
///
/// The declaration order is the order the form, the orchestrator and the
/// viewer walk the categories in, and also the `Ord` used by
/// [`crate::DocumentPaths`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum DocumentCategory {
    CompanyRegistration,
    CompanyDeclaration,
    ImportPermit,
    Tk1,
    Tk2,
    Tk3,
    Tk4,
    PurchaseOrder,
    IdCard,
    Msds,
    CommercialInvoice,
    PackingList,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown document category: {0}")]
pub struct UnknownCategory(pub String);

impl DocumentCategory {
    pub const ALL: [DocumentCategory; 12] = [
        DocumentCategory::CompanyRegistration,
        DocumentCategory::CompanyDeclaration,
        DocumentCategory::ImportPermit,
        DocumentCategory::Tk1,
        DocumentCategory::Tk2,
        DocumentCategory::Tk3,
        DocumentCategory::Tk4,
        DocumentCategory::PurchaseOrder,
        DocumentCategory::IdCard,
        DocumentCategory::Msds,
        DocumentCategory::CommercialInvoice,
        DocumentCategory::PackingList,
    ];

    /// Wire key: multipart field names, storage folder, JSON map key.
    pub fn as_str(&self) -> &'static str {
        match self {
            DocumentCategory::CompanyRegistration => "companyRegistration",
            DocumentCategory::CompanyDeclaration => "companyDeclaration",
            DocumentCategory::ImportPermit => "importPermit",
            DocumentCategory::Tk1 => "tk1",
            DocumentCategory::Tk2 => "tk2",
            DocumentCategory::Tk3 => "tk3",
            DocumentCategory::Tk4 => "tk4",
            DocumentCategory::PurchaseOrder => "purchaseOrder",
            DocumentCategory::IdCard => "idCard",
            DocumentCategory::Msds => "msds",
            DocumentCategory::CommercialInvoice => "commercialInvoice",
            DocumentCategory::PackingList => "packingList",
        }
    }

    /// Label shown next to the file input on the submission form.
    pub fn display_name(&self) -> &'static str {
        match self {
            DocumentCategory::CompanyRegistration => "Company Registration Certificate",
            DocumentCategory::CompanyDeclaration => "Company Declaration",
            DocumentCategory::ImportPermit => "Import Permit",
            DocumentCategory::Tk1 => "TK Form 1",
            DocumentCategory::Tk2 => "TK Form 2",
            DocumentCategory::Tk3 => "TK Form 3",
            DocumentCategory::Tk4 => "TK Form 4",
            DocumentCategory::PurchaseOrder => "Purchase Order",
            DocumentCategory::IdCard => "ID Card Copy",
            DocumentCategory::Msds => "MSDS",
            DocumentCategory::CommercialInvoice => "Commercial Invoice",
            DocumentCategory::PackingList => "Packing List",
        }
    }

    /// Label used on the submission list, derived from the wire key.
    pub fn label(&self) -> String {
        humanize_key(self.as_str())
    }
}

impl FromStr for DocumentCategory {
    type Err = UnknownCategory;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        DocumentCategory::ALL
            .iter()
            .copied()
            .find(|c| c.as_str() == s)
            .ok_or_else(|| UnknownCategory(s.to_string()))
    }
}

impl fmt::Display for DocumentCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Turn a camelCase key into words: a space goes before every capital
/// letter after the first character, then the first character is
/// upper-cased.
pub fn humanize_key(key: &str) -> String {
    let mut out = String::with_capacity(key.len() + 4);
    for (i, ch) in key.chars().enumerate() {
        if i > 0 && ch.is_uppercase() {
            out.push(' ');
        }
        if i == 0 {
            out.extend(ch.to_uppercase());
        } else {
            out.push(ch);
        }
    }
    out
}
