//! Government department taxonomy.
//!
//! Submissions are filed under a department, one of its sub-departments,
//! and one of that sub-department's services. Each service lists the
//! issues citizens most commonly raise about it.

use std::collections::BTreeSet;

use serde::Serialize;

/// A ministry or top-level government department.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Department {
    /// Stable id (e.g. `"health"`).
    pub id: &'static str,
    /// Display name.
    pub name: &'static str,
    /// Sub-departments in display order.
    pub sub_departments: &'static [SubDepartment],
}

/// A directorate or agency within a [`Department`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SubDepartment {
    /// Id, unique within its department.
    pub id: &'static str,
    /// Display name.
    pub name: &'static str,
    /// Services offered.
    pub services: &'static [Service],
}

/// A citizen-facing service.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Service {
    /// Id, unique within its sub-department.
    pub id: &'static str,
    /// Display name.
    pub name: &'static str,
    /// Frequently reported problems.
    pub common_issues: &'static [&'static str],
}

/// Summary of one department's catalog entries.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DepartmentStats {
    /// Department id.
    pub department_id: &'static str,
    /// Department display name.
    pub department_name: &'static str,
    /// Number of sub-departments.
    pub sub_department_count: usize,
    /// Number of services across all sub-departments.
    pub service_count: usize,
    /// Distinct common issues across all services, in first-seen order.
    pub common_issues: Vec<&'static str>,
}

/// All departments, in display order.
pub const DEPARTMENTS: &[Department] = &[
    Department {
        id: "interior",
        name: "Ministry of Interior & National Administration",
        sub_departments: &[
            SubDepartment {
                id: "national-id",
                name: "National ID & Civil Registration",
                services: &[
                    Service {
                        id: "birth-certificate",
                        name: "Birth Certificate Application",
                        common_issues: &[
                            "Delay in processing",
                            "Wrong details printed",
                            "Portal errors during application",
                            "Paid but certificate not issued",
                        ],
                    },
                    Service {
                        id: "national-id-application",
                        name: "National ID Application",
                        common_issues: &[
                            "Delay in issuance",
                            "Lost ID replacement issues",
                            "Errors in details (name, DOB)",
                        ],
                    },
                ],
            },
            SubDepartment {
                id: "immigration",
                name: "Immigration & Passports",
                services: &[
                    Service {
                        id: "passport-application",
                        name: "New Passport Application",
                        common_issues: &["Long delays", "Rejected application without reason"],
                    },
                    Service {
                        id: "passport-renewal",
                        name: "Passport Renewal",
                        common_issues: &[
                            "Payment made but not processed",
                            "Lost passport replacement delays",
                        ],
                    },
                ],
            },
        ],
    },
    Department {
        id: "education",
        name: "Ministry of Education",
        sub_departments: &[
            SubDepartment {
                id: "primary-secondary",
                name: "Primary & Secondary Education",
                services: &[Service {
                    id: "kcpe-kcse",
                    name: "KCPE/KCSE Registration",
                    common_issues: &["Incorrect candidate details", "Missing index numbers"],
                }],
            },
            SubDepartment {
                id: "higher-education",
                name: "Higher Education",
                services: &[
                    Service {
                        id: "kuccps",
                        name: "KUCCPS Placement",
                        common_issues: &["Wrong allocation", "Portal errors"],
                    },
                    Service {
                        id: "helb",
                        name: "HELB Loan Application",
                        common_issues: &["Disbursement delays", "Portal downtime"],
                    },
                ],
            },
        ],
    },
    Department {
        id: "health",
        name: "Ministry of Health",
        sub_departments: &[
            SubDepartment {
                id: "hospitals",
                name: "Hospitals & Clinics",
                services: &[Service {
                    id: "admission",
                    name: "Hospital Admission",
                    common_issues: &[
                        "Delayed admission",
                        "Lack of beds",
                        "Mistreatment by staff",
                    ],
                }],
            },
            SubDepartment {
                id: "nhif",
                name: "NHIF & Insurance",
                services: &[
                    Service {
                        id: "nhif-registration",
                        name: "NHIF Registration",
                        common_issues: &["Rejected without explanation", "Portal errors"],
                    },
                    Service {
                        id: "nhif-claims",
                        name: "Hospital Reimbursement",
                        common_issues: &[
                            "Claim rejected without explanation",
                            "Delayed reimbursement",
                        ],
                    },
                ],
            },
        ],
    },
    Department {
        id: "transport",
        name: "Ministry of Transport & Infrastructure",
        sub_departments: &[
            SubDepartment {
                id: "ntsa",
                name: "NTSA (Licensing & Registration)",
                services: &[
                    Service {
                        id: "driving-license",
                        name: "Driving License Application",
                        common_issues: &["Delays in Smart DL", "Wrong details on license"],
                    },
                    Service {
                        id: "vehicle-registration",
                        name: "Motor Vehicle Registration",
                        common_issues: &["Delayed number plates", "Duplicate records"],
                    },
                ],
            },
            SubDepartment {
                id: "roads",
                name: "Roads & Highways",
                services: &[Service {
                    id: "maintenance",
                    name: "Road Maintenance",
                    common_issues: &["Potholes", "Unfinished projects"],
                }],
            },
        ],
    },
    Department {
        id: "finance",
        name: "Ministry of Finance & National Treasury",
        sub_departments: &[
            SubDepartment {
                id: "kra",
                name: "Kenya Revenue Authority",
                services: &[
                    Service {
                        id: "tax-filing",
                        name: "Tax Filing",
                        common_issues: &["Portal downtime", "Wrong penalties applied"],
                    },
                    Service {
                        id: "pin-registration",
                        name: "PIN Registration",
                        common_issues: &["Delayed issuance", "Errors in details"],
                    },
                ],
            },
            SubDepartment {
                id: "customs",
                name: "Customs & Excise",
                services: &[Service {
                    id: "cargo-clearance",
                    name: "Cargo Clearance",
                    common_issues: &["Excessive delays", "Unfair duty charges"],
                }],
            },
        ],
    },
    Department {
        id: "water",
        name: "Ministry of Water, Sanitation & Irrigation",
        sub_departments: &[
            SubDepartment {
                id: "water-supply",
                name: "Water Supply & Distribution",
                services: &[Service {
                    id: "billing",
                    name: "Water Billing",
                    common_issues: &["Overbilling", "No water supply despite billing"],
                }],
            },
            SubDepartment {
                id: "irrigation",
                name: "Irrigation Schemes",
                services: &[Service {
                    id: "scheme-maintenance",
                    name: "Scheme Maintenance",
                    common_issues: &["Non-functional canals", "Delayed repairs"],
                }],
            },
        ],
    },
    Department {
        id: "energy",
        name: "Ministry of Energy & Petroleum",
        sub_departments: &[SubDepartment {
            id: "kplc",
            name: "Kenya Power & Lighting Company",
            services: &[
                Service {
                    id: "billing",
                    name: "Electricity Billing",
                    common_issues: &["Overbilling", "Meter errors"],
                },
                Service {
                    id: "outages",
                    name: "Power Outages",
                    common_issues: &["Frequent blackouts", "Delayed reconnection"],
                },
            ],
        }],
    },
    Department {
        id: "ict",
        name: "Ministry of ICT & Digital Economy",
        sub_departments: &[
            SubDepartment {
                id: "ecitizen",
                name: "eCitizen Services",
                services: &[Service {
                    id: "payments",
                    name: "Payments",
                    common_issues: &["Payment failures", "Service delays"],
                }],
            },
            SubDepartment {
                id: "huduma",
                name: "Huduma Centres",
                services: &[Service {
                    id: "queues",
                    name: "Service Queues",
                    common_issues: &["Long waiting times", "Unavailability of services"],
                }],
            },
        ],
    },
];

/// Looks up a department by id.
#[must_use]
pub fn find_department(id: &str) -> Option<&'static Department> {
    DEPARTMENTS.iter().find(|d| d.id == id)
}

/// Looks up a sub-department within a department.
#[must_use]
pub fn find_sub_department(
    department_id: &str,
    sub_department_id: &str,
) -> Option<&'static SubDepartment> {
    find_department(department_id)?
        .sub_departments
        .iter()
        .find(|s| s.id == sub_department_id)
}

/// Looks up a service within a sub-department.
#[must_use]
pub fn find_service(
    department_id: &str,
    sub_department_id: &str,
    service_id: &str,
) -> Option<&'static Service> {
    find_sub_department(department_id, sub_department_id)?
        .services
        .iter()
        .find(|s| s.id == service_id)
}

/// Returns departments whose own name, or any sub-department or service
/// name, contains `query` (case-insensitive).
#[must_use]
pub fn search_departments(query: &str) -> Vec<&'static Department> {
    let needle = query.trim().to_lowercase();
    let matches = |name: &str| name.to_lowercase().contains(&needle);

    DEPARTMENTS
        .iter()
        .filter(|dept| {
            matches(dept.name)
                || dept.sub_departments.iter().any(|sub| {
                    matches(sub.name) || sub.services.iter().any(|svc| matches(svc.name))
                })
        })
        .collect()
}

/// Per-department catalog summary.
#[must_use]
pub fn department_stats() -> Vec<DepartmentStats> {
    DEPARTMENTS
        .iter()
        .map(|dept| {
            let services = dept.sub_departments.iter().flat_map(|sub| sub.services);

            let mut seen = BTreeSet::new();
            let mut common_issues = Vec::new();
            let mut service_count = 0;
            for service in services {
                service_count += 1;
                for issue in service.common_issues {
                    if seen.insert(*issue) {
                        common_issues.push(*issue);
                    }
                }
            }

            DepartmentStats {
                department_id: dept.id,
                department_name: dept.name,
                sub_department_count: dept.sub_departments.len(),
                service_count,
                common_issues,
            }
        })
        .collect()
}

impl crate::DepartmentSelection {
    /// Fills in any missing display names from the catalog.
    ///
    /// Ids that do not match a catalog entry leave the corresponding name
    /// untouched.
    pub fn fill_names(&mut self) {
        if let Some(dept) = find_department(&self.department_id) {
            self.department_name
                .get_or_insert_with(|| dept.name.to_string());
        }
        if let Some(sub) = find_sub_department(&self.department_id, &self.sub_department_id) {
            self.sub_department_name
                .get_or_insert_with(|| sub.name.to_string());
        }
        if let Some(service) = find_service(
            &self.department_id,
            &self.sub_department_id,
            &self.service_id,
        ) {
            self.service_name
                .get_or_insert_with(|| service.name.to_string());
        }
    }
}
