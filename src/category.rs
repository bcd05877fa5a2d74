//! Closed set of legal-domain categories.
//!
//! The catch-all is canonically `Other` (serialized `"Other"`). Older labels
//! seen in provider replies (`"Other Legal"`, `"Non-Legal"`) parse to it, so
//! the corrector and the outward contract only ever deal with one scheme.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Category {
    Contract,
    WillsTrustsEstates,
    CriminalProcedure,
    RealEstate,
    EmploymentLaw,
    PersonalInjury,
    FamilyLaw,
    Other,
}

impl Category {
    /// Outward label, matching the function-call enum sent to the provider.
    pub fn label(&self) -> &'static str {
        match self {
            Category::Contract => "Contract",
            Category::WillsTrustsEstates => "Wills, Trusts, and Estates",
            Category::CriminalProcedure => "Criminal Procedure",
            Category::RealEstate => "Real Estate",
            Category::EmploymentLaw => "Employment Law",
            Category::PersonalInjury => "Personal Injury",
            Category::FamilyLaw => "Family Law",
            Category::Other => "Other",
        }
    }

    /// All named (non-catch-all) categories, in corrector priority order.
    pub const NAMED_PRIORITY: [Category; 7] = [
        Category::WillsTrustsEstates,
        Category::Contract,
        Category::RealEstate,
        Category::PersonalInjury,
        Category::CriminalProcedure,
        Category::EmploymentLaw,
        Category::FamilyLaw,
    ];

    /// Lenient parse of a provider-declared category. Blank input yields `None`;
    /// anything non-blank but unrecognized maps to the catch-all.
    pub fn parse_lenient(raw: &str) -> Option<Category> {
        let s = raw.trim();
        if s.is_empty() {
            return None;
        }
        let lc = s.to_ascii_lowercase();
        let cat = match lc.as_str() {
            "contract" | "contracts" | "contract law" => Category::Contract,
            "wills, trusts, and estates"
            | "wills, trusts and estates"
            | "wills/trusts/estates"
            | "estates"
            | "estate law"
            | "wills and trusts" => Category::WillsTrustsEstates,
            "criminal procedure" | "criminal law" | "criminal" => Category::CriminalProcedure,
            "real estate" | "real estate law" | "property law" => Category::RealEstate,
            "employment law" | "employment" | "labor law" => Category::EmploymentLaw,
            "personal injury" | "personal injury law" | "tort" | "tort law" => {
                Category::PersonalInjury
            }
            "family law" | "family" => Category::FamilyLaw,
            "other" | "other legal" | "non-legal" | "non legal" | "nonlegal" | "none" => {
                Category::Other
            }
            _ => Category::Other,
        };
        Some(cat)
    }
}

impl std::fmt::Display for Category {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}
