//! Editor content blocks and their composition into canonical [`ResumeData`].
//!
//! The editor stores what the user typed (JSON-Resume-like `basics` plus an ordered
//! list of typed blocks). Templates read a flatter shape, so every block is mapped
//! onto its canonical collection before rendering.

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{json, Map, Value};

use crate::models::resume::ResumeData;

const ONGOING_END_DATE: &str = "Present";

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Basics {
    #[serde(deserialize_with = "lenient_text")]
    pub name: Option<String>,
    /// Headline, rendered as `personalInfo.title`.
    #[serde(deserialize_with = "lenient_text")]
    pub label: Option<String>,
    #[serde(deserialize_with = "lenient_text")]
    pub email: Option<String>,
    #[serde(deserialize_with = "lenient_text")]
    pub phone: Option<String>,
    #[serde(deserialize_with = "lenient_text")]
    pub url: Option<String>,
    pub location: Option<Location>,
    pub profiles: Vec<Profile>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Location {
    #[serde(deserialize_with = "lenient_text")]
    pub city: Option<String>,
    #[serde(deserialize_with = "lenient_text")]
    pub region: Option<String>,
    #[serde(deserialize_with = "lenient_text")]
    pub country_code: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Profile {
    #[serde(deserialize_with = "lenient_text")]
    pub network: Option<String>,
    #[serde(deserialize_with = "lenient_text")]
    pub username: Option<String>,
    #[serde(deserialize_with = "lenient_text")]
    pub url: Option<String>,
}

/// One editor block. Unrecognised block types (e.g. `header`) are accepted and ignored.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "kebab-case")]
pub enum ContentBlock {
    Summary {
        #[serde(default, deserialize_with = "lenient_text")]
        content: Option<String>,
    },
    Work {
        #[serde(default)]
        entries: Vec<WorkEntry>,
    },
    Education {
        #[serde(default)]
        entries: Vec<EducationEntry>,
    },
    Skills {
        #[serde(default)]
        groups: Vec<SkillGroup>,
    },
    Projects {
        #[serde(default)]
        entries: Vec<ProjectEntry>,
    },
    Awards {
        #[serde(default)]
        entries: Vec<AwardEntry>,
    },
    Volunteer {
        #[serde(default)]
        entries: Vec<VolunteerEntry>,
    },
    Publications {
        #[serde(default)]
        entries: Vec<PublicationEntry>,
    },
    Languages {
        #[serde(default)]
        entries: Vec<LanguageEntry>,
    },
    Interests {
        #[serde(default)]
        entries: Vec<InterestEntry>,
    },
    #[serde(other)]
    Other,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct WorkEntry {
    #[serde(deserialize_with = "lenient_text")]
    pub company: Option<String>,
    #[serde(deserialize_with = "lenient_text")]
    pub position: Option<String>,
    #[serde(deserialize_with = "lenient_text")]
    pub location: Option<String>,
    #[serde(deserialize_with = "lenient_text")]
    pub start_date: Option<String>,
    #[serde(deserialize_with = "lenient_text")]
    pub end_date: Option<String>,
    /// Free text; one bullet per non-empty line.
    #[serde(deserialize_with = "lenient_text")]
    pub summary: Option<String>,
    #[serde(deserialize_with = "lenient_list")]
    pub highlights: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct EducationEntry {
    #[serde(deserialize_with = "lenient_text")]
    pub institution: Option<String>,
    #[serde(deserialize_with = "lenient_text")]
    pub study_type: Option<String>,
    #[serde(deserialize_with = "lenient_text")]
    pub area: Option<String>,
    #[serde(deserialize_with = "lenient_text")]
    pub start_date: Option<String>,
    #[serde(deserialize_with = "lenient_text")]
    pub end_date: Option<String>,
    #[serde(deserialize_with = "lenient_text")]
    pub score: Option<String>,
    #[serde(deserialize_with = "lenient_text")]
    pub summary: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SkillGroup {
    #[serde(deserialize_with = "lenient_text")]
    pub name: Option<String>,
    #[serde(deserialize_with = "lenient_list")]
    pub keywords: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProjectEntry {
    #[serde(deserialize_with = "lenient_text")]
    pub name: Option<String>,
    #[serde(deserialize_with = "lenient_text")]
    pub description: Option<String>,
    #[serde(deserialize_with = "lenient_text")]
    pub url: Option<String>,
    #[serde(deserialize_with = "lenient_list")]
    pub technologies: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AwardEntry {
    #[serde(deserialize_with = "lenient_text")]
    pub title: Option<String>,
    #[serde(deserialize_with = "lenient_text")]
    pub date: Option<String>,
    #[serde(deserialize_with = "lenient_text")]
    pub awarder: Option<String>,
    #[serde(deserialize_with = "lenient_text")]
    pub summary: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct VolunteerEntry {
    #[serde(deserialize_with = "lenient_text")]
    pub organization: Option<String>,
    #[serde(deserialize_with = "lenient_text")]
    pub position: Option<String>,
    #[serde(deserialize_with = "lenient_text")]
    pub start_date: Option<String>,
    #[serde(deserialize_with = "lenient_text")]
    pub end_date: Option<String>,
    #[serde(deserialize_with = "lenient_text")]
    pub summary: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct PublicationEntry {
    #[serde(deserialize_with = "lenient_text")]
    pub name: Option<String>,
    #[serde(deserialize_with = "lenient_text")]
    pub publisher: Option<String>,
    #[serde(deserialize_with = "lenient_text")]
    pub release_date: Option<String>,
    #[serde(deserialize_with = "lenient_text")]
    pub url: Option<String>,
    #[serde(deserialize_with = "lenient_text")]
    pub summary: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LanguageEntry {
    #[serde(deserialize_with = "lenient_text")]
    pub language: Option<String>,
    #[serde(deserialize_with = "lenient_text")]
    pub fluency: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct InterestEntry {
    #[serde(deserialize_with = "lenient_text")]
    pub name: Option<String>,
    #[serde(deserialize_with = "lenient_list")]
    pub keywords: Vec<String>,
}

/// Builds the canonical render data from editor input. Later blocks of the same
/// type replace earlier ones.
pub fn compose_resume_data(basics: &Basics, blocks: &[ContentBlock]) -> ResumeData {
    let mut personal = personal_info(basics);
    let mut data = Map::new();

    for block in blocks {
        match block {
            ContentBlock::Summary { content } => {
                personal.insert("summary".into(), json!(text(content)));
            }
            ContentBlock::Work { entries } => {
                data.insert("experience".into(), entries.iter().map(work_entry).collect());
            }
            ContentBlock::Education { entries } => {
                let items = entries.iter().map(|e| {
                    json!({
                        "institution": text(&e.institution),
                        "degree": text(&e.study_type),
                        "area": text(&e.area),
                        "startDate": text(&e.start_date),
                        "endDate": text(&e.end_date),
                        "year": text(&e.end_date),
                        "gpa": text(&e.score),
                        "summary": text(&e.summary),
                    })
                });
                data.insert("education".into(), items.collect());
            }
            ContentBlock::Skills { groups } => {
                let keywords = groups.iter().flat_map(|g| non_blank(&g.keywords));
                data.insert("skills".into(), keywords.map(Value::from).collect());
            }
            ContentBlock::Projects { entries } => {
                let items = entries
                    .iter()
                    .filter(|p| !text(&p.name).is_empty())
                    .map(|p| {
                        json!({
                            "name": text(&p.name),
                            "description": text(&p.description),
                            "url": text(&p.url),
                            "technologies": non_blank(&p.technologies).collect::<Vec<_>>(),
                        })
                    });
                data.insert("projects".into(), items.collect());
            }
            ContentBlock::Awards { entries } => {
                let awards = entries.iter().map(|a| {
                    json!({
                        "title": text(&a.title),
                        "date": text(&a.date),
                        "awarder": text(&a.awarder),
                        "summary": text(&a.summary),
                    })
                });
                let certifications = entries.iter().map(|a| {
                    json!({
                        "name": text(&a.title),
                        "year": text(&a.date),
                        "issuer": text(&a.awarder),
                    })
                });
                data.insert("awards".into(), awards.collect());
                data.insert("certifications".into(), certifications.collect());
            }
            ContentBlock::Volunteer { entries } => {
                let items = entries.iter().map(|v| {
                    json!({
                        "organization": text(&v.organization),
                        "position": text(&v.position),
                        "startDate": text(&v.start_date),
                        "endDate": text(&v.end_date),
                        "summary": text(&v.summary),
                    })
                });
                data.insert("volunteer".into(), items.collect());
            }
            ContentBlock::Publications { entries } => {
                let items = entries.iter().map(|p| {
                    json!({
                        "name": text(&p.name),
                        "publisher": text(&p.publisher),
                        "releaseDate": text(&p.release_date),
                        "url": text(&p.url),
                        "summary": text(&p.summary),
                    })
                });
                data.insert("publications".into(), items.collect());
            }
            ContentBlock::Languages { entries } => {
                let items = entries.iter().map(|l| {
                    json!({ "language": text(&l.language), "fluency": text(&l.fluency) })
                });
                data.insert("languages".into(), items.collect());
            }
            ContentBlock::Interests { entries } => {
                let items = entries.iter().map(|i| {
                    json!({
                        "name": text(&i.name),
                        "keywords": non_blank(&i.keywords).collect::<Vec<_>>(),
                    })
                });
                data.insert("interests".into(), items.collect());
            }
            ContentBlock::Other => {}
        }
    }

    data.insert("personalInfo".into(), Value::Object(personal));
    ResumeData(Value::Object(data))
}

fn personal_info(basics: &Basics) -> Map<String, Value> {
    let profile = |network: &str| {
        basics
            .profiles
            .iter()
            .find(|p| {
                p.network
                    .as_deref()
                    .is_some_and(|n| n.eq_ignore_ascii_case(network))
            })
            .map(|p| text(&p.username))
            .unwrap_or_default()
    };
    let city = basics.location.as_ref().map(|l| text(&l.city)).unwrap_or_default();

    let info = json!({
        "name": text(&basics.name),
        "title": text(&basics.label),
        "email": text(&basics.email),
        "phone": text(&basics.phone),
        "location": city,
        "website": text(&basics.url),
        "linkedin": profile("linkedin"),
        "github": profile("github"),
        "summary": "",
    });
    match info {
        Value::Object(map) => map,
        _ => Map::new(),
    }
}

/// Multi-line summaries become bullets; otherwise highlights are used as-is.
fn work_entry(entry: &WorkEntry) -> Value {
    let summary = text(&entry.summary);
    let description: Vec<String> = if summary.trim().is_empty() {
        non_blank(&entry.highlights).collect()
    } else {
        summary
            .lines()
            .map(str::trim)
            .filter(|l| !l.is_empty())
            .map(str::to_string)
            .collect()
    };

    let start_date = text(&entry.start_date);
    let end_date = match text(&entry.end_date) {
        end if end.is_empty() && !start_date.is_empty() => ONGOING_END_DATE.to_string(),
        end => end,
    };

    json!({
        "company": text(&entry.company),
        "title": text(&entry.position),
        "location": text(&entry.location),
        "startDate": start_date,
        "endDate": end_date,
        "summary": summary,
        "description": description,
        "highlights": non_blank(&entry.highlights).collect::<Vec<_>>(),
    })
}

fn text(value: &Option<String>) -> String {
    value.as_deref().map(str::trim).unwrap_or_default().to_string()
}

/// Editor fields are free-form JSON. Numbers and booleans are kept as their text;
/// anything else reads as missing.
fn lenient_text<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(scalar_text(Value::deserialize(deserializer)?))
}

fn lenient_list<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Value::deserialize(deserializer)? {
        Value::Array(items) => items.into_iter().filter_map(scalar_text).collect(),
        other => scalar_text(other).into_iter().collect(),
    })
}

fn scalar_text(value: Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

fn non_blank(items: &[String]) -> impl Iterator<Item = String> + '_ {
    items
        .iter()
        .map(|s| s.trim())
        .filter(|s| !s.is_empty())
        .map(str::to_string)
}
