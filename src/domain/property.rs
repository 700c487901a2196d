//! Typed view over the property encodings returned by the database query API.
//!
//! Every property object carries a `type` tag naming the key that holds its
//! payload (`{"type":"select","select":{...}}`). The tag drives a closed enum
//! so each kind the feed understands is matched explicitly; any other kind
//! lands in `Unsupported`.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum PropertyValue {
    Title {
        #[serde(default)]
        title: Vec<RichTextRun>,
    },
    RichText {
        #[serde(default)]
        rich_text: Vec<RichTextRun>,
    },
    Select {
        select: Option<SelectOption>,
    },
    MultiSelect {
        #[serde(default)]
        multi_select: Vec<SelectOption>,
    },
    People {
        #[serde(default)]
        people: Vec<Person>,
    },
    Rollup {
        rollup: Rollup,
    },
    #[serde(other)]
    Unsupported,
}

/// One formatted run inside a title or rich-text value.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct RichTextRun {
    #[serde(default)]
    pub plain_text: String,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct SelectOption {
    #[serde(default)]
    pub name: String,
}

/// A user referenced by a people property. Bots have no `person` block.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Person {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub person: Option<PersonDetails>,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct PersonDetails {
    #[serde(default)]
    pub email: Option<String>,
}

impl Person {
    /// Display name, falling back to the email address. Blank values count as missing.
    pub fn label(&self) -> Option<&str> {
        let name = self.name.as_deref().map(str::trim).filter(|n| !n.is_empty());
        name.or_else(|| {
            self.person
                .as_ref()
                .and_then(|p| p.email.as_deref())
                .map(str::trim)
                .filter(|e| !e.is_empty())
        })
    }
}

/// Computed value of a rollup property.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Rollup {
    /// Items are full property values of the related records.
    Array {
        #[serde(default)]
        array: Vec<PropertyValue>,
    },
    Number {
        number: Option<serde_json::Number>,
    },
    Date {
        date: Option<DateRange>,
    },
    #[serde(other)]
    Unsupported,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct DateRange {
    #[serde(default)]
    pub start: String,
    #[serde(default)]
    pub end: Option<String>,
}
