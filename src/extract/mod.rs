//! Contact and company-name extraction
//!
//! Everything here is a pure function over page text or metadata, with no
//! network access and no state carried between calls.

mod company;
mod contacts;

pub use company::{infer_company_name, name_from_domain, PageMetadata};
pub use contacts::{
    clean_text, extract_contacts, normalize_phone, ContactSet, ADDRESS_HINTS,
};
