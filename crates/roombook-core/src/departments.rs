//! Department and major catalogue offered at registration

/// Departments and the majors each one runs
pub const DEPARTMENTS: &[(&str, &[&str])] = &[
    (
        "DTE (Departemen Teknik Elektro)",
        &[
            "S1 Terapan Teknik Elektronika",
            "D3 Teknik Elektronika",
            "S1 Terapan Teknik Telekomunikasi",
            "D3 Teknik Telekomunikasi",
            "S1 Terapan Teknik Elektro Industri",
            "D3 Teknik Elektro Industri",
            "S1 Terapan Teknologi Rekayasa Internet",
        ],
    ),
    (
        "DTIK (Departemen Teknik Informatika dan Komputer)",
        &[
            "S1 Terapan Teknik Informatika",
            "D3 Teknik Informatika",
            "S1 Terapan Teknik Komputer",
            "S1 Terapan Sains Data Terapan",
            "D3 Teknik Informatika (Kampus Lamongan)",
            "D3 Teknik Informatika (Kampus Sumenep)",
        ],
    ),
    (
        "DTE (Departemen Teknik Mekanika & Energi)",
        &[
            "S1 Terapan Teknik Mekatronika",
            "S1 Terapan Sistem Pembangkit Energi",
        ],
    ),
    (
        "DTMK (Departemen Teknologi Multimedia Kreatif)",
        &[
            "D3 Teknologi Multimedia Broadcasting",
            "S1 Terapan Teknologi Game",
            "S1 Terapan Teknologi Rekayasa Multimedia",
            "D3 Teknologi Multimedia Broadcasting (Kampus Lamongan)",
            "D3 Teknologi Multimedia Broadcasting (Kampus Sumenep)",
        ],
    ),
];

/// Department names in catalogue order
pub fn departments() -> impl Iterator<Item = &'static str> {
    DEPARTMENTS.iter().map(|(name, _)| *name)
}

/// Majors of a department, `None` if the department is unknown
#[must_use]
pub fn majors_of(department: &str) -> Option<&'static [&'static str]> {
    DEPARTMENTS
        .iter()
        .find(|(name, _)| *name == department)
        .map(|(_, majors)| *majors)
}

/// Whether `major` is offered by `department`
#[must_use]
pub fn is_valid_major(department: &str, major: &str) -> bool {
    majors_of(department).is_some_and(|majors| majors.contains(&major))
}
