use serde::{Deserialize, Serialize};

use crate::errors::ModelError;

/// A blog post record. Ids are assigned by the store and never change
/// once assigned.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct Post {
    pub id: u64,
    pub title: String,
    pub content: String,
}

/// Field a post listing may be ordered by.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SortField {
    Title,
    Content,
}

impl SortField {
    pub fn parse(value: &str) -> Result<Self, ModelError> {
        match value {
            "title" => Ok(Self::Title),
            "content" => Ok(Self::Content),
            _ => Err(ModelError::Validation(
                "Invalid sort field. Must be 'title' or 'content'.".into(),
            )),
        }
    }

    /// The sort key this field selects from a post.
    pub fn key<'a>(&self, post: &'a Post) -> &'a str {
        match self {
            Self::Title => &post.title,
            Self::Content => &post.content,
        }
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum SortDirection {
    #[default]
    Asc,
    Desc,
}

impl SortDirection {
    pub fn parse(value: &str) -> Result<Self, ModelError> {
        match value {
            "asc" => Ok(Self::Asc),
            "desc" => Ok(Self::Desc),
            _ => Err(ModelError::Validation(
                "Invalid sort direction. Must be 'asc' or 'desc'.".into(),
            )),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_valid_sort_params() {
        assert_eq!(SortField::parse("title").unwrap(), SortField::Title);
        assert_eq!(SortField::parse("content").unwrap(), SortField::Content);
        assert_eq!(SortDirection::parse("asc").unwrap(), SortDirection::Asc);
        assert_eq!(SortDirection::parse("desc").unwrap(), SortDirection::Desc);
    }

    #[test]
    fn rejects_unknown_sort_params() {
        assert!(matches!(
            SortField::parse("author"),
            Err(ModelError::Validation(_))
        ));
        // case sensitive, like the query contract
        assert!(SortField::parse("Title").is_err());
        assert!(SortDirection::parse("descending").is_err());
    }

    #[test]
    fn sort_field_selects_key() {
        let post = Post {
            id: 1,
            title: "Hello".into(),
            content: "World".into(),
        };
        assert_eq!(SortField::Title.key(&post), "Hello");
        assert_eq!(SortField::Content.key(&post), "World");
    }
}
