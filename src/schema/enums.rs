//! Fixed value sets accepted by the Tomba API filters.

/// Departments accepted by domain search.
pub const DEPARTMENTS: &[&str] = &[
    "engineering",
    "sales",
    "finance",
    "hr",
    "it",
    "marketing",
    "operations",
    "management",
    "executive",
    "legal",
    "support",
    "communication",
    "software",
    "security",
    "pr",
    "warehouse",
    "diversity",
    "administrative",
    "facilities",
    "accounting",
];

/// Company types accepted by the companies search `type` filter.
pub const COMPANY_TYPES: &[&str] = &[
    "education",
    "government",
    "nonprofit",
    "private",
    "public",
    "personal",
];

/// Headcount bands accepted by the companies search `size` filter.
pub const COMPANY_SIZES: &[&str] = &[
    "1-10", "11-50", "51-250", "251-1K", "1K-5K", "5K-10K", "10K-50K", "50K-100K", "100K+",
];

/// Annual revenue bands accepted by the companies search `revenue` filter.
pub const REVENUE_RANGES: &[&str] = &[
    "$0-$1M",
    "$1M-$10M",
    "$10M-$50M",
    "$50M-$100M",
    "$100M-$250M",
    "$250M-$500M",
    "$500M-$1B",
    "$1B-$10B",
    "$10B+",
];

/// Allowed `limit` values for domain search.
pub const DOMAIN_SEARCH_LIMITS: &[i64] = &[10, 20, 50];

/// Industries accepted by the companies search `industry` filter
/// (LinkedIn Industry Codes V2).
pub const INDUSTRIES: &[&str] = &[
    "Computer Software",
    "Information Technology and Services",
    "Internet",
    "Computer Hardware",
    "Computer Networking",
    "Computer & Network Security",
    "Semiconductors",
    "Telecommunications",
    "Wireless",
    "Management Consulting",
    "Human Resources",
    "Staffing and Recruiting",
    "Professional Training & Coaching",
    "Business Supplies and Equipment",
    "Outsourcing/Offshoring",
    "Financial Services",
    "Banking",
    "Investment Banking",
    "Investment Management",
    "Venture Capital & Private Equity",
    "Insurance",
    "Accounting",
    "Hospital & Health Care",
    "Medical Devices",
    "Pharmaceuticals",
    "Biotechnology",
    "Health, Wellness and Fitness",
    "Mental Health Care",
    "Veterinary",
    "Automotive",
    "Aviation & Aerospace",
    "Chemicals",
    "Civil Engineering",
    "Construction",
    "Electrical/Electronic Manufacturing",
    "Industrial Automation",
    "Machinery",
    "Manufacturing",
    "Mechanical or Industrial Engineering",
    "Mining & Metals",
    "Oil & Energy",
    "Plastics",
    "Renewables & Environment",
    "Utilities",
    "Retail",
    "Consumer Electronics",
    "Consumer Goods",
    "Consumer Services",
    "Cosmetics",
    "Food & Beverages",
    "Food Production",
    "Luxury Goods & Jewelry",
    "Sporting Goods",
    "Supermarkets",
    "Wine and Spirits",
    "Broadcast Media",
    "Entertainment",
    "Media Production",
    "Motion Pictures and Film",
    "Music",
    "Newspapers",
    "Online Media",
    "Publishing",
    "Animation",
    "Computer Games",
    "Gambling & Casinos",
    "Marketing and Advertising",
    "Market Research",
    "Public Relations and Communications",
    "Events Services",
    "Graphic Design",
    "Education Management",
    "E-Learning",
    "Higher Education",
    "Primary/Secondary Education",
    "Research",
    "Law Practice",
    "Legal Services",
    "Government Administration",
    "Government Relations",
    "Judiciary",
    "Legislative Office",
    "Military",
    "Public Policy",
    "Public Safety",
    "Real Estate",
    "Commercial Real Estate",
    "Property Management",
    "Airlines/Aviation",
    "Logistics and Supply Chain",
    "Maritime",
    "Package/Freight Delivery",
    "Railroad Manufacture",
    "Shipbuilding",
    "Transportation/Trucking/Railroad",
    "Warehousing",
    "Hospitality",
    "Hotels",
    "Restaurants",
    "Leisure, Travel & Tourism",
    "Recreational Facilities and Services",
    "Nonprofit Organization Management",
    "Philanthropy",
    "Religious Institutions",
    "Think Tanks",
    "Civic & Social Organization",
    "Political Organization",
    "Agriculture",
    "Apparel & Fashion",
    "Architecture & Planning",
    "Arts and Crafts",
    "Building Materials",
    "Design",
    "Environmental Services",
    "Facilities Services",
    "Fine Art",
    "Fishery",
    "Furniture",
    "Glass, Ceramics & Concrete",
    "Import and Export",
    "Individual & Family Services",
    "International Affairs",
    "International Trade and Development",
    "Law Enforcement",
    "Libraries",
    "Nanotechnology",
    "Museums and Institutions",
    "Packaging and Containers",
    "Paper & Forest Products",
    "Performing Arts",
    "Photography",
    "Printing",
    "Program Development",
    "Ranching",
    "Security and Investigations",
    "Sports",
    "Textiles",
    "Tobacco",
    "Translation and Localization",
    "Writing and Editing",
    "Wholesale",
];

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_unique(values: &[&str]) {
        let mut sorted = values.to_vec();
        sorted.sort_unstable();
        sorted.dedup();
        assert_eq!(sorted.len(), values.len());
    }

    #[test]
    fn value_sets_have_no_duplicates() {
        assert_unique(DEPARTMENTS);
        assert_unique(COMPANY_TYPES);
        assert_unique(COMPANY_SIZES);
        assert_unique(REVENUE_RANGES);
        assert_unique(INDUSTRIES);
    }
}
