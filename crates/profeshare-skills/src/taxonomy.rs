//! The fixed skill taxonomy and its keyword lists.
//!
//! Declaration order matters: categorization walks [`SkillCategory::ALL`]
//! front to back and stops at the first match. `Cybersecurity` therefore
//! claims tools like Nmap before `Tools & Software` sees them, and
//! `Cloud & DevOps` claims Linux before `Operating Systems`.

use std::fmt;
use std::sync::LazyLock;

use serde::{Deserialize, Serialize};

/// A display category for skills.
///
/// `Ord` follows declaration order, so ordered maps keyed by category
/// iterate in taxonomy order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum SkillCategory {
    #[serde(rename = "Programming Languages")]
    ProgrammingLanguages,
    #[serde(rename = "Web Technologies")]
    WebTechnologies,
    #[serde(rename = "Databases")]
    Databases,
    #[serde(rename = "Cloud & DevOps")]
    CloudDevOps,
    #[serde(rename = "Cybersecurity")]
    Cybersecurity,
    #[serde(rename = "Networking")]
    Networking,
    #[serde(rename = "Operating Systems")]
    OperatingSystems,
    #[serde(rename = "Tools & Software")]
    ToolsSoftware,
    /// Catch-all for skills no keyword matched.
    #[serde(rename = "Other")]
    Other,
}

impl SkillCategory {
    /// Every category, in matching order. `Other` is last.
    pub const ALL: [SkillCategory; 9] = [
        Self::ProgrammingLanguages,
        Self::WebTechnologies,
        Self::Databases,
        Self::CloudDevOps,
        Self::Cybersecurity,
        Self::Networking,
        Self::OperatingSystems,
        Self::ToolsSoftware,
        Self::Other,
    ];

    /// Human-readable label, also used as the serialized form.
    pub fn label(&self) -> &'static str {
        match self {
            Self::ProgrammingLanguages => "Programming Languages",
            Self::WebTechnologies => "Web Technologies",
            Self::Databases => "Databases",
            Self::CloudDevOps => "Cloud & DevOps",
            Self::Cybersecurity => "Cybersecurity",
            Self::Networking => "Networking",
            Self::OperatingSystems => "Operating Systems",
            Self::ToolsSoftware => "Tools & Software",
            Self::Other => "Other",
        }
    }

    /// Look a category up by its label, ignoring ASCII case.
    pub fn from_label(label: &str) -> Option<Self> {
        let label = label.trim();
        Self::ALL
            .into_iter()
            .find(|c| c.label().eq_ignore_ascii_case(label))
    }

    /// Keywords that place a skill in this category. Empty for `Other`.
    pub fn keywords(&self) -> &'static [&'static str] {
        match self {
            Self::ProgrammingLanguages => &[
                "Python",
                "JavaScript",
                "Java",
                "C++",
                "C#",
                "TypeScript",
                "PHP",
                "Ruby",
                "Golang",
                "Rust",
                "Swift",
                "Kotlin",
                "Scala",
                "MATLAB",
                "Perl",
                "Dart",
                "Assembly",
                "Haskell",
            ],
            Self::WebTechnologies => &[
                "React", "Vue", "Angular", "HTML", "CSS", "Node.js", "Express", "Django", "Flask",
                "Tailwind", "Bootstrap", "jQuery", "Next.js", "Nuxt.js", "Gatsby", "Webpack",
                "Vite",
            ],
            Self::Databases => &[
                "MongoDB",
                "MySQL",
                "PostgreSQL",
                "Redis",
                "SQLite",
                "Firebase",
                "Firestore",
                "DynamoDB",
                "Cassandra",
                "Neo4j",
                "SQL",
                "NoSQL",
            ],
            Self::CloudDevOps => &[
                "AWS",
                "Azure",
                "GCP",
                "Docker",
                "Kubernetes",
                "Jenkins",
                "Git",
                "GitHub",
                "GitLab",
                "CircleCI",
                "Travis CI",
                "Terraform",
                "Ansible",
                "Linux",
                "Unix",
            ],
            Self::Cybersecurity => &[
                "Ethical Hacking",
                "Penetration Testing",
                "Cybersecurity",
                "Network Security",
                "Wireshark",
                "Burp Suite",
                "Metasploit",
                "Nmap",
                "OWASP",
                "SQL Injection",
                "XSS",
                "CSRF",
                "Vulnerability Assessment",
                "Security Auditing",
                "Cybersecurity Auditing",
                "Firewall",
                "IDS",
                "IPS",
                "SIEM",
                "Cryptography",
            ],
            Self::Networking => &[
                "Networking",
                "TCP/IP",
                "DNS",
                "DHCP",
                "VPN",
                "Router",
                "Switch",
                "Firewall",
                "Network Administration",
                "Network Monitoring",
                "Network Troubleshooting",
            ],
            Self::OperatingSystems => &[
                "Linux", "Windows", "macOS", "Unix", "Ubuntu", "CentOS", "Red Hat", "Debian",
            ],
            Self::ToolsSoftware => &[
                "Wireshark",
                "Burp Suite",
                "Metasploit",
                "Nmap",
                "Figma",
                "Sketch",
                "Adobe XD",
                "Photoshop",
                "Illustrator",
                "VS Code",
                "IntelliJ",
                "Eclipse",
            ],
            Self::Other => &[],
        }
    }

    /// Whether `skill_lower` (already lower-cased) matches any keyword of
    /// this category in either direction.
    pub(crate) fn matches(&self, skill_lower: &str) -> bool {
        LOWERED[*self as usize]
            .iter()
            .any(|kw| skill_lower.contains(kw.as_str()) || kw.contains(skill_lower))
    }
}

impl fmt::Display for SkillCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Lower-cased keyword lists, indexed by discriminant.
static LOWERED: LazyLock<Vec<Vec<String>>> = LazyLock::new(|| {
    SkillCategory::ALL
        .iter()
        .map(|c| c.keywords().iter().map(|kw| kw.to_lowercase()).collect())
        .collect()
});

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
