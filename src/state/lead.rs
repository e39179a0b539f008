use serde::Serialize;

/// One structured contact record for a single business domain
///
/// Field order is significant for tabular output: name, website, phone,
/// email, location, source_page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Lead {
    /// Company name inferred from page metadata or the domain
    pub name: String,

    /// Site root without trailing slash
    pub website: String,

    /// Best phone candidate, empty when none was found
    pub phone: String,

    /// Best email candidate, real or synthesized from the domain
    pub email: String,

    /// Address-like text snippet, empty when none was found
    pub location: String,

    /// Page the contact data came from
    pub source_page: String,
}

impl Lead {
    /// Column headers in output order
    pub const FIELDS: [&'static str; 6] =
        ["name", "website", "phone", "email", "location", "source_page"];

    /// Field values in output order
    pub fn fields(&self) -> [&str; 6] {
        [
            &self.name,
            &self.website,
            &self.phone,
            &self.email,
            &self.location,
            &self.source_page,
        ]
    }

    /// A lead is only worth keeping when it can be identified
    pub fn has_identity(&self) -> bool {
        !self.name.is_empty() && !self.website.is_empty()
    }
}
