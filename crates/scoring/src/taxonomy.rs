//! Static skill vocabulary and role-to-skills reference table.
//!
//! The [`Taxonomy`] is loaded once at process start (either the built-in table
//! or a TOML file) and then shared read-only, usually behind an `Arc`.
//!
//! ## File format
//!
//! ```toml
//! version = "2025.1"
//! skills = ["Docker", "Git", "Python"]
//!
//! [roles]
//! "Python Backend" = ["Python", "Docker", "Git"]
//! ```

use crate::error::{Result, ScoringError};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet, HashMap};
use std::path::Path;

/// Version label of the compiled-in table.
pub const BUILTIN_VERSION: &str = "builtin-1";

/// Ordered vocabulary of recognized skill tokens.
const BUILTIN_SKILLS: &[&str] = &[
    "AirFlow",
    "Atlassian stack [Jira, Confluence]",
    "Back-end разработка",
    "C",
    "C#",
    "C++",
    "CDN",
    "CSS",
    "Canva",
    "Computer Vision",
    "Data Engineering",
    "Data Science",
    "Deep Learning",
    "DevOps",
    "Django",
    "Docker",
    "ETL",
    "Figma",
    "Git",
    "Go",
    "HTML",
    "Hadoop",
    "Jupyter",
    "Kafka",
    "Keras",
    "Kotlin",
    "Kubernetes",
    "K8S",
    "Linux",
    "Machine Learning",
    "Matplotlib",
    "NumPy",
    "ONNX Runtime",
    "OpenCV",
    "Pandas",
    "PyTorch",
    "Python",
    "React",
    "SQL",
    "Scikit-Learn",
    "Seaborn",
    "TensorFlow",
    "Математическая статистика",
    "Построение Rest API",
    "Разработка моделей данных",
    "СУБД PostgreSQL",
    "Умение работать с API",
    "Управление проектами",
    "Java",
    "Spring Boot",
    "S3",
    "Next",
    "Vue",
    "Android разработка",
    "IOS разработка",
    "Desktop разработка",
    "Helm",
    "Nexus",
    "Nginx",
    "ELK",
    "Graphana",
    "Zustand",
    "SSR",
    "Tailwind",
    "MUI",
    "Shadcn",
];

/// Skills implied by each role.
const BUILTIN_ROLES: &[(&str, &[&str])] = &[
    (
        "Java Backend",
        &[
            "Java",
            "Spring Boot",
            "PostgreSQL",
            "Git",
            "Построение Rest API",
            "Умение работать с API",
            "Back-end разработка",
            "Linux",
            "Docker",
            "Kubernetes",
            "SQL",
        ],
    ),
    (
        "C# Backend",
        &[
            "C#",
            "Back-end разработка",
            "Docker",
            "SQL",
            "Git",
            "Умение работать с API",
            "СУБД PostgreSQL",
            ".NET",
            "Linux",
            "Kubernetes",
            "Nginx",
            "Управление проектами",
        ],
    ),
    (
        "Go Backend",
        &[
            "Go",
            "Back-end разработка",
            "Docker",
            "Git",
            "Kubernetes",
            "SQL",
            "Linux",
            "Helm",
            "Nginx",
            "Умение работать с API",
            "Grafana",
            "Управление проектами",
        ],
    ),
    (
        "Python Backend",
        &[
            "Python",
            "Django",
            "Docker",
            "Построение Rest API",
            "SQL",
            "СУБД PostgreSQL",
            "Git",
            "Back-end разработка",
            "Linux",
            "Kubernetes",
            "Nginx",
            "Умение работать с API",
        ],
    ),
    (
        "C++ Backend",
        &[
            "C++",
            "Back-end разработка",
            "Git",
            "Linux",
            "Docker",
            "Kubernetes",
            "SQL",
            "Умение работать с API",
            "PostgreSQL",
            "Управление проектами",
        ],
    ),
    (
        "Frontend",
        &[
            "React",
            "CSS",
            "HTML",
            "JavaScript",
            "Tailwind",
            "Next",
            "Vue",
            "Git",
            "Figma",
            "Canva",
            "UI/UX",
            "Zustand",
            "SSR",
            "MUI",
            "Shadcn",
            "Nginx",
        ],
    ),
    (
        "ML engineer",
        &[
            "Machine Learning",
            "Python",
            "TensorFlow",
            "Scikit-Learn",
            "Pandas",
            "NumPy",
            "Deep Learning",
            "PyTorch",
            "Data Science",
            "SQL",
            "Matplotlib",
            "Seaborn",
            "Управление проектами",
            "Jupyter",
            "Keras",
            "OpenCV",
            "Computer Vision",
        ],
    ),
    (
        "DevOps",
        &[
            "Docker",
            "Kubernetes",
            "Linux",
            "Helm",
            "Nginx",
            "Grafana",
            "AirFlow",
            "K8S",
            "Git",
            "Nexus",
            "ELK",
            "CDN",
            "S3",
            "Hadoop",
            "Управление проектами",
            "Умение работать с API",
        ],
    ),
    (
        "Тестировщик",
        &[
            "Python",
            "PostgreSQL",
            "Умение работать с API",
            "Atlassian stack [Jira, Confluence]",
            "Linux",
            "SQL",
            "Git",
            "Управление проектами",
            "Docker",
            "Automated testing",
        ],
    ),
    (
        "Аналитик",
        &[
            "Data Science",
            "SQL",
            "Pandas",
            "Математическая статистика",
            "Управление проектами",
            "Data Engineering",
            "Разработка моделей данных",
            "Python",
            "Jupyter",
            "Умение работать с API",
        ],
    ),
    (
        "Дизайнер",
        &[
            "Figma",
            "Canva",
            "CSS",
            "UI/UX",
            "Photoshop",
            "Adobe XD",
            "JavaScript",
            "HTML",
            "Tailwind",
            "React",
        ],
    ),
    (
        "Инженер БПЛА",
        &[
            "C++",
            "Python",
            "Computer Vision",
            "Linux",
            "Kubernetes",
            "Docker",
            "OpenCV",
            "TensorFlow",
            "Machine Learning",
            "Git",
            "ROS",
        ],
    ),
    (
        "CV engineer",
        &[
            "Computer Vision",
            "OpenCV",
            "Python",
            "PyTorch",
            "TensorFlow",
            "Machine Learning",
            "Deep Learning",
            "Scikit-Learn",
            "NumPy",
            "Pandas",
            "Data Science",
            "Jupyter",
            "Keras",
            "ONNX Runtime",
        ],
    ),
    (
        "ML Ops Engineer",
        &[
            "DevOps",
            "AirFlow",
            "Kubernetes",
            "ONNX Runtime",
            "Docker",
            "Linux",
            "Grafana",
            "TensorFlow",
            "Machine Learning",
            "PyTorch",
            "Git",
            "Hadoop",
            "Nginx",
            "K8S",
            "S3",
            "CDN",
            "Управление проектами",
        ],
    ),
];

/// On-disk representation of a taxonomy file.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TaxonomyFile {
    /// Free-form version label.
    pub version: String,
    /// Ordered skill vocabulary.
    pub skills: Vec<String>,
    /// Role name to implied skills.
    #[serde(default)]
    pub roles: BTreeMap<String, Vec<String>>,
}

/// Immutable skill vocabulary plus role mapping.
#[derive(Debug, Clone)]
pub struct Taxonomy {
    version: String,
    vocabulary: Vec<String>,
    index: HashMap<String, usize>,
    roles: BTreeMap<String, BTreeSet<String>>,
}

impl Taxonomy {
    /// Build a taxonomy from an ordered vocabulary and a role table.
    ///
    /// Fails if the vocabulary is empty or lists a skill twice. Roles mapped
    /// to no skills are accepted but logged, since requiring them later makes
    /// coverage evaluation fail.
    pub fn new<S, R, I>(version: impl Into<String>, skills: S, roles: R) -> Result<Self>
    where
        S: IntoIterator,
        S::Item: Into<String>,
        R: IntoIterator<Item = (String, I)>,
        I: IntoIterator,
        I::Item: Into<String>,
    {
        let vocabulary: Vec<String> = skills.into_iter().map(Into::into).collect();
        if vocabulary.is_empty() {
            return Err(ScoringError::InvalidTaxonomy(
                "skill vocabulary is empty".to_string(),
            ));
        }

        let mut index = HashMap::with_capacity(vocabulary.len());
        for (i, skill) in vocabulary.iter().enumerate() {
            if index.insert(skill.clone(), i).is_some() {
                return Err(ScoringError::InvalidTaxonomy(format!(
                    "skill '{skill}' appears more than once in the vocabulary"
                )));
            }
        }

        let roles: BTreeMap<String, BTreeSet<String>> = roles
            .into_iter()
            .map(|(role, skills)| (role, skills.into_iter().map(Into::into).collect()))
            .collect();

        for (role, skills) in &roles {
            if skills.is_empty() {
                tracing::warn!(
                    target: "crewfit::taxonomy",
                    role = %role,
                    "Role maps to no skills; requiring it will fail coverage evaluation"
                );
            }
        }

        Ok(Self {
            version: version.into(),
            vocabulary,
            index,
            roles,
        })
    }

    /// The compiled-in reference table.
    pub fn builtin() -> Self {
        Self::new(
            BUILTIN_VERSION,
            BUILTIN_SKILLS.iter().copied(),
            BUILTIN_ROLES
                .iter()
                .map(|(role, skills)| (role.to_string(), skills.iter().copied())),
        )
        // Covered by `builtin_table_is_consistent`.
        .expect("built-in taxonomy table is valid")
    }

    /// Parse a taxonomy from TOML text.
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let file: TaxonomyFile = toml::from_str(content)
            .map_err(|e| ScoringError::InvalidTaxonomy(format!("failed to parse TOML: {e}")))?;
        Self::new(file.version, file.skills, file.roles)
    }

    /// Load a taxonomy TOML file from disk.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            ScoringError::InvalidTaxonomy(format!("failed to read {}: {e}", path.display()))
        })?;
        let taxonomy = Self::from_toml_str(&content)?;

        tracing::info!(
            target: "crewfit::taxonomy",
            path = %path.display(),
            version = %taxonomy.version,
            skills = taxonomy.vocabulary.len(),
            roles = taxonomy.roles.len(),
            "Loaded taxonomy"
        );

        Ok(taxonomy)
    }

    /// Convert back to the on-disk shape.
    pub fn to_file(&self) -> TaxonomyFile {
        TaxonomyFile {
            version: self.version.clone(),
            skills: self.vocabulary.clone(),
            roles: self
                .roles
                .iter()
                .map(|(role, skills)| (role.clone(), skills.iter().cloned().collect()))
                .collect(),
        }
    }

    pub fn version(&self) -> &str {
        &self.version
    }

    /// Ordered skill vocabulary; position `i` is vector coordinate `i`.
    pub fn vocabulary(&self) -> &[String] {
        &self.vocabulary
    }

    /// Vocabulary size, i.e. skill-vector dimension.
    pub fn dimension(&self) -> usize {
        self.vocabulary.len()
    }

    /// Coordinate of `skill`, if it is part of the vocabulary.
    pub fn index_of(&self, skill: &str) -> Option<usize> {
        self.index.get(skill).copied()
    }

    /// Skills mapped to `role`, or `None` when the role is unknown.
    pub fn role_skills(&self, role: &str) -> Option<&BTreeSet<String>> {
        self.roles.get(role)
    }

    pub fn has_role(&self, role: &str) -> bool {
        self.roles.contains_key(role)
    }

    /// Iterate roles in name order.
    pub fn roles(&self) -> impl Iterator<Item = (&str, &BTreeSet<String>)> {
        self.roles.iter().map(|(r, s)| (r.as_str(), s))
    }

    pub fn role_count(&self) -> usize {
        self.roles.len()
    }

    /// Union of the skills implied by `roles`.
    ///
    /// Unknown roles contribute nothing; they are logged rather than rejected.
    pub fn skills_for_roles<'a, I>(&self, roles: I) -> BTreeSet<String>
    where
        I: IntoIterator<Item = &'a str>,
    {
        let mut skills = BTreeSet::new();
        for role in roles {
            match self.roles.get(role) {
                Some(mapped) => skills.extend(mapped.iter().cloned()),
                None => tracing::warn!(
                    target: "crewfit::taxonomy",
                    role,
                    "Unknown role treated as an empty skill set"
                ),
            }
        }
        skills
    }
}

impl Default for Taxonomy {
    fn default() -> Self {
        Self::builtin()
    }
}
