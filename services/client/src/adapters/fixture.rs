//! services/client/src/adapters/fixture.rs
//!
//! An in-memory backend with a small built-in catalog, used when the client runs
//! without a remote service.

use async_trait::async_trait;
use coursehub_core::catalog::{Category, Major};
use coursehub_core::domain::{AcademicContext, AskRequest, Course, CourseFile, FileQuery};
use coursehub_core::ports::{CourseCatalogService, PortResult, QuestionAnsweringService};

/// Serves a fixed set of courses per major, and synthesizes file listings from them.
#[derive(Clone, Debug, Default)]
pub struct StaticCatalog;

impl StaticCatalog {
    pub fn new() -> Self {
        Self
    }

    fn courses_for(major: Major) -> &'static [(&'static str, &'static str, &'static str)] {
        match major {
            Major::SoftwareEngineering => &[
                ("se101", "Introduction to Programming", "SE101"),
                ("se210", "Software Design", "SE210"),
                ("cs201", "Data Structures", "CS201"),
            ],
            Major::DataScience => &[
                ("ds101", "Foundations of Data Science", "DS101"),
                ("cs201", "Data Structures", "CS201"),
                ("st220", "Statistical Inference", "ST220"),
            ],
            Major::Cybersecurity => &[
                ("cy110", "Network Fundamentals", "CY110"),
                ("cy230", "Applied Cryptography", "CY230"),
            ],
            Major::ArtificialIntelligence => &[
                ("ai150", "Intro to Machine Learning", "AI150"),
                ("cs201", "Data Structures", "CS201"),
            ],
        }
    }

    fn file_names(category: Category) -> &'static [&'static str] {
        match category {
            Category::PastPapers => &["Midterm 2023", "Final 2023"],
            Category::Slides => &["Week 1", "Week 2", "Week 3"],
            Category::Homeworks => &["Assignment 1"],
            Category::Other => &[],
        }
    }
}

#[async_trait]
impl CourseCatalogService for StaticCatalog {
    async fn list_courses(&self, context: &AcademicContext) -> PortResult<Vec<Course>> {
        Ok(Self::courses_for(context.major)
            .iter()
            .map(|(id, name, code)| Course {
                id: id.to_string(),
                name: name.to_string(),
                code: Some(code.to_string()),
            })
            .collect())
    }

    async fn list_files(&self, query: &FileQuery) -> PortResult<Vec<CourseFile>> {
        let prefix = query
            .context
            .query_pairs()
            .into_iter()
            .map(|(_, key)| key)
            .collect::<Vec<_>>()
            .join("/");

        Ok(Self::file_names(query.category)
            .iter()
            .enumerate()
            .map(|(i, label)| {
                let id = format!("{}-{}-{}", query.course_id, query.category.key(), i + 1);
                CourseFile {
                    url: format!("https://files.coursehub.local/{}/{}/{}.pdf", prefix, query.course_id, id),
                    id,
                    label: label.to_string(),
                    date: None,
                }
            })
            .collect())
    }
}

#[async_trait]
impl QuestionAnsweringService for StaticCatalog {
    async fn answer_question(&self, request: &AskRequest) -> PortResult<Option<String>> {
        let scope = match request.category {
            Some(category) => format!("{} ({})", request.course_id, category.label()),
            None => request.course_id.clone(),
        };
        Ok(Some(format!(
            "The offline catalog has no assistant. Your question about {} was: {}",
            scope,
            request.question.trim()
        )))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use coursehub_core::catalog::{Semester, Year};

    fn context() -> AcademicContext {
        AcademicContext {
            major: Major::DataScience,
            year: Year::Year2,
            semester: Some(Semester::First),
        }
    }

    #[tokio::test]
    async fn courses_depend_on_major() {
        let catalog = StaticCatalog::new();
        let courses = catalog.list_courses(&context()).await.unwrap();
        assert!(courses.iter().any(|c| c.id == "cs201"));
        assert!(courses.iter().all(|c| c.code.is_some()));
    }

    #[tokio::test]
    async fn other_category_is_empty_but_not_an_error() {
        let catalog = StaticCatalog::new();
        let query = FileQuery {
            course_id: "cs201".into(),
            category: Category::Other,
            context: context(),
        };
        assert!(catalog.list_files(&query).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn file_urls_embed_the_full_triple() {
        let catalog = StaticCatalog::new();
        let query = FileQuery {
            course_id: "cs201".into(),
            category: Category::Slides,
            context: context(),
        };
        let files = catalog.list_files(&query).await.unwrap();
        assert_eq!(files.len(), 3);
        assert!(files[0].url.contains("DataScience/Year2/Semester-a/cs201"));
    }
}
