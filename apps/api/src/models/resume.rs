use serde::{Deserialize, Serialize};

/// Structured view of a resume, produced by the classifier seam from raw text.
/// Every field tolerates absence so partial classifier output still deserializes.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StructuredResume {
    pub name: String,
    pub email: String,
    pub phone: String,
    pub location: String,
    pub summary: String,
    pub skills: Vec<String>,
    pub experience: Vec<ExperienceEntry>,
    pub education: Vec<EducationEntry>,
}

impl StructuredResume {
    /// Every non-empty field on its own line, in document order. Lets text-only
    /// consumers see what the candidate actually supplied.
    pub fn to_plain_text(&self) -> String {
        let skills = self.skills.join(", ");
        let mut fields = vec![
            self.name.as_str(),
            self.email.as_str(),
            self.phone.as_str(),
            self.location.as_str(),
            self.summary.as_str(),
            skills.as_str(),
        ];
        for entry in &self.experience {
            fields.extend([
                entry.title.as_str(),
                entry.company.as_str(),
                entry.date.as_str(),
                entry.description.as_str(),
            ]);
        }
        for entry in &self.education {
            fields.extend([
                entry.degree.as_str(),
                entry.school.as_str(),
                entry.date.as_str(),
                entry.gpa.as_str(),
            ]);
        }

        fields
            .into_iter()
            .map(str::trim)
            .filter(|field| !field.is_empty())
            .collect::<Vec<_>>()
            .join("\n")
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExperienceEntry {
    pub title: String,
    pub company: String,
    pub date: String,
    pub description: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EducationEntry {
    pub degree: String,
    pub school: String,
    pub date: String,
    pub gpa: String,
}
