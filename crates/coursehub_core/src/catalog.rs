//! crates/coursehub_core/src/catalog.rs
//!
//! The static domain tables: majors, years, semesters and material categories.
//! Keys are the exact strings the backend stores data under; labels are for display.

use std::str::FromStr;

/// Returned when a string is not a key of the corresponding table.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("'{value}' is not a known {table} key")]
pub struct UnknownKey {
    pub table: &'static str,
    pub value: String,
}

//=========================================================================================
// Academic Dimensions
//=========================================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Major {
    SoftwareEngineering,
    DataScience,
    Cybersecurity,
    ArtificialIntelligence,
}

impl Major {
    pub const ALL: [Major; 4] = [
        Major::SoftwareEngineering,
        Major::DataScience,
        Major::Cybersecurity,
        Major::ArtificialIntelligence,
    ];

    pub fn key(self) -> &'static str {
        match self {
            Major::SoftwareEngineering => "SoftwareEngineering",
            Major::DataScience => "DataScience",
            Major::Cybersecurity => "Cybersecurity",
            Major::ArtificialIntelligence => "ArtificialIntelligence",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Major::SoftwareEngineering => "Software Engineering",
            Major::DataScience => "Data Science",
            Major::Cybersecurity => "Cybersecurity",
            Major::ArtificialIntelligence => "Artificial Intelligence",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Year {
    Year1,
    Year2,
    Year3,
    Year4,
}

impl Year {
    pub const ALL: [Year; 4] = [Year::Year1, Year::Year2, Year::Year3, Year::Year4];

    pub fn key(self) -> &'static str {
        match self {
            Year::Year1 => "Year1",
            Year::Year2 => "Year2",
            Year::Year3 => "Year3",
            Year::Year4 => "Year4",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Year::Year1 => "1st Year",
            Year::Year2 => "2nd Year",
            Year::Year3 => "3rd Year",
            Year::Year4 => "4th Year",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Semester {
    First,
    Second,
}

impl Semester {
    pub const ALL: [Semester; 2] = [Semester::First, Semester::Second];

    pub fn key(self) -> &'static str {
        match self {
            Semester::First => "Semester-a",
            Semester::Second => "Semester-b",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Semester::First => "Semester 1",
            Semester::Second => "Semester 2",
        }
    }
}

//=========================================================================================
// Material Categories
//=========================================================================================

/// The four fixed material categories a course's files are grouped under.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Category {
    PastPapers,
    Slides,
    Homeworks,
    Other,
}

impl Category {
    pub const ALL: [Category; 4] = [
        Category::PastPapers,
        Category::Slides,
        Category::Homeworks,
        Category::Other,
    ];

    pub fn key(self) -> &'static str {
        match self {
            Category::PastPapers => "past-papers",
            Category::Slides => "slides",
            Category::Homeworks => "homeworks",
            Category::Other => "other",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Category::PastPapers => "Past Papers",
            Category::Slides => "Lecture Slides",
            Category::Homeworks => "Assignments",
            Category::Other => "Course Resources",
        }
    }

    /// Accent color used when rendering the category, as a CSS hex string.
    pub fn color(self) -> &'static str {
        match self {
            Category::PastPapers => "#667eea",
            Category::Slides => "#764ba2",
            Category::Homeworks => "#f093fb",
            Category::Other => "#48bb78",
        }
    }
}

//=========================================================================================
// Key Parsing
//=========================================================================================

fn parse_key<T: Copy>(
    table: &'static str,
    all: &[T],
    key_of: fn(T) -> &'static str,
    value: &str,
) -> Result<T, UnknownKey> {
    all.iter()
        .copied()
        .find(|item| key_of(*item) == value)
        .ok_or_else(|| UnknownKey {
            table,
            value: value.to_string(),
        })
}

impl FromStr for Major {
    type Err = UnknownKey;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse_key("major", &Major::ALL, Major::key, s)
    }
}

impl FromStr for Year {
    type Err = UnknownKey;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse_key("year", &Year::ALL, Year::key, s)
    }
}

impl FromStr for Semester {
    type Err = UnknownKey;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse_key("semester", &Semester::ALL, Semester::key, s)
    }
}

impl FromStr for Category {
    type Err = UnknownKey;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse_key("category", &Category::ALL, Category::key, s)
    }
}

//=========================================================================================
// Context Shape
//=========================================================================================

/// How many dimensions the academic context has.
///
/// `MajorYear` drops the semester entirely: it is neither required during setup
/// nor sent to the backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ContextShape {
    MajorYear,
    #[default]
    MajorYearSemester,
}

impl ContextShape {
    pub fn requires_semester(self) -> bool {
        matches!(self, ContextShape::MajorYearSemester)
    }
}

impl FromStr for ContextShape {
    type Err = UnknownKey;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "major-year" => Ok(ContextShape::MajorYear),
            "major-year-semester" => Ok(ContextShape::MajorYearSemester),
            other => Err(UnknownKey {
                table: "context shape",
                value: other.to_string(),
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keys_parse_back_to_their_variant() {
        for major in Major::ALL {
            assert_eq!(major.key().parse::<Major>(), Ok(major));
        }
        for category in Category::ALL {
            assert_eq!(category.key().parse::<Category>(), Ok(category));
        }
        assert_eq!("Semester-b".parse::<Semester>(), Ok(Semester::Second));
    }

    #[test]
    fn every_category_has_a_distinct_color() {
        let colors: std::collections::HashSet<_> = Category::ALL.iter().map(|c| c.color()).collect();
        assert_eq!(colors.len(), Category::ALL.len());
        assert_eq!(Category::Slides.color(), "#764ba2");
    }

    #[test]
    fn labels_are_not_accepted_as_keys() {
        let err = "Data Science".parse::<Major>().unwrap_err();
        assert_eq!(err.table, "major");
        assert!("Lecture Slides".parse::<Category>().is_err());
        assert!("".parse::<Year>().is_err());
    }

    #[test]
    fn context_shape_parses_config_values() {
        assert_eq!("major-year".parse::<ContextShape>(), Ok(ContextShape::MajorYear));
        assert_eq!(
            " Major-Year-Semester ".parse::<ContextShape>(),
            Ok(ContextShape::MajorYearSemester)
        );
        assert!("semester".parse::<ContextShape>().is_err());
    }
}
