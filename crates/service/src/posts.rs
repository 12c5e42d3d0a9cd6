use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tokio::sync::RwLock;

use models::post::{Post, SortDirection, SortField};

use crate::errors::ServiceError;

/// Creation input: both keys are required in the payload, but only key
/// presence is checked. Empty strings are accepted.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct NewPost {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub content: Option<String>,
}

impl NewPost {
    /// Presence check only, per the API contract.
    pub fn validate(&self) -> Result<(), ServiceError> {
        if self.title.is_none() || self.content.is_none() {
            return Err(ServiceError::MissingField(
                "Both 'title' and 'content' fields are required.".into(),
            ));
        }
        Ok(())
    }
}

/// Partial update: absent fields keep their stored value.
#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct PostPatch {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub content: Option<String>,
}

/// In-memory post store. The collection keeps insertion order; every
/// read-modify-write sequence runs under a single lock acquisition so
/// concurrent requests cannot interleave observably.
pub struct PostStore {
    inner: RwLock<Vec<Post>>,
}

impl PostStore {
    /// Empty store, mainly for tests.
    pub fn new() -> Arc<Self> {
        Arc::new(Self {
            inner: RwLock::new(Vec::new()),
        })
    }

    /// Store initialized with the two seed records present at process start.
    pub fn seeded() -> Arc<Self> {
        Arc::new(Self {
            inner: RwLock::new(vec![
                Post {
                    id: 1,
                    title: "First post".into(),
                    content: "This is the first post.".into(),
                },
                Post {
                    id: 2,
                    title: "Second post".into(),
                    content: "This is the second post.".into(),
                },
            ]),
        })
    }

    /// List all posts. Without a sort field the result is in insertion
    /// order; with one, it is stably ordered by that field, compared
    /// case-insensitively. Sorting never touches the stored collection.
    pub async fn list(&self, sort: Option<SortField>, direction: SortDirection) -> Vec<Post> {
        let mut posts = self.inner.read().await.clone();
        if let Some(field) = sort {
            posts.sort_by(|a, b| {
                let ka = field.key(a).to_lowercase();
                let kb = field.key(b).to_lowercase();
                match direction {
                    SortDirection::Asc => ka.cmp(&kb),
                    SortDirection::Desc => kb.cmp(&ka),
                }
            });
        }
        posts
    }

    /// Create a post. The new id is `max(existing ids) + 1`, or 1 for an
    /// empty collection, so deleting the highest id frees that id for reuse.
    pub async fn create(&self, input: NewPost) -> Result<Post, ServiceError> {
        input.validate()?;
        let mut posts = self.inner.write().await;
        let post = Post {
            id: next_id(&posts),
            title: input.title.unwrap_or_default(),
            content: input.content.unwrap_or_default(),
        };
        posts.push(post.clone());
        Ok(post)
    }

    /// Apply a partial update to the post with the given id. The id itself
    /// never changes.
    pub async fn update(&self, id: u64, patch: PostPatch) -> Result<Post, ServiceError> {
        let mut posts = self.inner.write().await;
        let post = posts
            .iter_mut()
            .find(|p| p.id == id)
            .ok_or_else(|| ServiceError::post_not_found(id))?;
        if let Some(title) = patch.title {
            post.title = title;
        }
        if let Some(content) = patch.content {
            post.content = content;
        }
        Ok(post.clone())
    }

    /// Remove the post with the given id.
    pub async fn delete(&self, id: u64) -> Result<(), ServiceError> {
        let mut posts = self.inner.write().await;
        let idx = posts
            .iter()
            .position(|p| p.id == id)
            .ok_or_else(|| ServiceError::post_not_found(id))?;
        posts.remove(idx);
        Ok(())
    }

    /// Case-insensitive substring search over title and/or content. A post
    /// matches when a non-empty query matches its field; with both queries
    /// empty, nothing matches. Results keep insertion order.
    pub async fn search(&self, title_query: &str, content_query: &str) -> Vec<Post> {
        let title_query = title_query.to_lowercase();
        let content_query = content_query.to_lowercase();
        self.inner
            .read()
            .await
            .iter()
            .filter(|post| {
                let title_matches =
                    !title_query.is_empty() && post.title.to_lowercase().contains(&title_query);
                let content_matches = !content_query.is_empty()
                    && post.content.to_lowercase().contains(&content_query);
                title_matches || content_matches
            })
            .cloned()
            .collect()
    }
}

fn next_id(posts: &[Post]) -> u64 {
    posts.iter().map(|p| p.id).max().map_or(1, |max| max + 1)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn new_post(title: &str, content: &str) -> NewPost {
        NewPost {
            title: Some(title.into()),
            content: Some(content.into()),
        }
    }

    #[tokio::test]
    async fn seeded_store_lists_in_insertion_order() {
        let store = PostStore::seeded();
        let posts = store.list(None, SortDirection::Asc).await;
        assert_eq!(posts.len(), 2);
        assert_eq!(posts[0].id, 1);
        assert_eq!(posts[0].title, "First post");
        assert_eq!(posts[1].id, 2);
    }

    #[tokio::test]
    async fn create_assigns_next_id_and_appends() {
        let store = PostStore::seeded();
        let created = store.create(new_post("Third", "c")).await.expect("create");
        assert_eq!(created.id, 3);
        let posts = store.list(None, SortDirection::Asc).await;
        assert_eq!(posts.last().unwrap().id, 3);
    }

    #[tokio::test]
    async fn first_id_on_empty_store_is_one() {
        let store = PostStore::new();
        let created = store.create(new_post("T", "C")).await.expect("create");
        assert_eq!(created.id, 1);
    }

    #[tokio::test]
    async fn deleting_highest_id_frees_it_for_reuse() {
        let store = PostStore::seeded();
        let created = store.create(new_post("Third", "c")).await.expect("create");
        assert_eq!(created.id, 3);
        store.delete(3).await.expect("delete");
        let again = store.create(new_post("Third again", "c")).await.expect("create");
        assert_eq!(again.id, 3);
    }

    #[tokio::test]
    async fn create_rejects_missing_fields_but_accepts_empty_strings() {
        let store = PostStore::new();
        let missing = NewPost {
            title: Some("T".into()),
            content: None,
        };
        assert!(matches!(
            store.create(missing).await,
            Err(ServiceError::MissingField(_))
        ));
        // empty values still satisfy the presence check
        let empty = store.create(new_post("", "")).await.expect("create");
        assert_eq!(empty.title, "");
    }

    #[tokio::test]
    async fn sorted_list_is_a_permutation_and_leaves_order_intact() {
        let store = PostStore::new();
        store.create(new_post("banana", "3")).await.unwrap();
        store.create(new_post("Apple", "1")).await.unwrap();
        store.create(new_post("cherry", "2")).await.unwrap();

        let by_title = store.list(Some(SortField::Title), SortDirection::Asc).await;
        let titles: Vec<_> = by_title.iter().map(|p| p.title.as_str()).collect();
        // case-insensitive: "Apple" sorts before "banana"
        assert_eq!(titles, ["Apple", "banana", "cherry"]);

        let desc = store.list(Some(SortField::Content), SortDirection::Desc).await;
        let contents: Vec<_> = desc.iter().map(|p| p.content.as_str()).collect();
        assert_eq!(contents, ["3", "2", "1"]);

        // stored order untouched by sorting
        let unsorted = store.list(None, SortDirection::Asc).await;
        let titles: Vec<_> = unsorted.iter().map(|p| p.title.as_str()).collect();
        assert_eq!(titles, ["banana", "Apple", "cherry"]);

        // permutation: same ids in every view
        let mut ids: Vec<_> = by_title.iter().map(|p| p.id).collect();
        ids.sort_unstable();
        assert_eq!(ids, [1, 2, 3]);
    }

    #[tokio::test]
    async fn sort_is_stable_for_equal_keys() {
        let store = PostStore::new();
        store.create(new_post("same", "first")).await.unwrap();
        store.create(new_post("SAME", "second")).await.unwrap();
        let sorted = store.list(Some(SortField::Title), SortDirection::Asc).await;
        assert_eq!(sorted[0].content, "first");
        assert_eq!(sorted[1].content, "second");
        // equal keys keep insertion order under desc as well
        let desc = store.list(Some(SortField::Title), SortDirection::Desc).await;
        assert_eq!(desc[0].content, "first");
    }

    #[tokio::test]
    async fn update_overwrites_present_fields_and_preserves_absent_ones() {
        let store = PostStore::seeded();
        let updated = store
            .update(
                1,
                PostPatch {
                    title: Some("Renamed".into()),
                    content: None,
                },
            )
            .await
            .expect("update");
        assert_eq!(updated.id, 1);
        assert_eq!(updated.title, "Renamed");
        assert_eq!(updated.content, "This is the first post.");

        let updated = store
            .update(
                1,
                PostPatch {
                    title: None,
                    content: Some("New body".into()),
                },
            )
            .await
            .expect("update");
        assert_eq!(updated.title, "Renamed");
        assert_eq!(updated.content, "New body");
    }

    #[tokio::test]
    async fn update_unknown_id_is_not_found() {
        let store = PostStore::seeded();
        assert!(matches!(
            store.update(99, PostPatch::default()).await,
            Err(ServiceError::NotFound(_))
        ));
    }

    #[tokio::test]
    async fn delete_is_not_idempotent() {
        let store = PostStore::seeded();
        store.delete(2).await.expect("first delete");
        assert!(matches!(
            store.delete(2).await,
            Err(ServiceError::NotFound(_))
        ));
        assert_eq!(store.list(None, SortDirection::Asc).await.len(), 1);
    }

    #[tokio::test]
    async fn search_matches_substrings_case_insensitively() {
        let store = PostStore::seeded();
        let matches = store.search("FIRST", "").await;
        assert_eq!(matches.len(), 1);
        assert_eq!(matches[0].id, 1);

        // either field can match
        let matches = store.search("first", "second").await;
        let ids: Vec<_> = matches.iter().map(|p| p.id).collect();
        assert_eq!(ids, [1, 2]);
    }

    #[tokio::test]
    async fn search_with_both_queries_empty_matches_nothing() {
        let store = PostStore::seeded();
        assert!(store.search("", "").await.is_empty());
    }

    #[tokio::test]
    async fn created_post_round_trips_through_search() {
        let store = PostStore::seeded();
        let created = store
            .create(new_post("Unmistakable title", "Some body"))
            .await
            .expect("create");
        let found = store.search("unmistakable", "").await;
        assert_eq!(found, vec![created]);
    }
}
