//! The client-held copy of the backend's post list.
//!
//! The list is an unsynchronized cache of the last fetch, patched in place
//! after successful mutations. Ids are unique within it.

pub use postboard_api_types::{Post, PostDraft, PostId};

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PostList {
    posts: Vec<Post>,
}

impl PostList {
    /// Build a list from a backend response, keeping the first occurrence of each id.
    pub fn from_response(posts: Vec<Post>) -> Self {
        let mut list = Self {
            posts: Vec::with_capacity(posts.len()),
        };
        for post in posts {
            if list.get(post.id).is_none() {
                list.posts.push(post);
            }
        }
        list
    }

    pub fn as_slice(&self) -> &[Post] {
        &self.posts
    }

    pub fn len(&self) -> usize {
        self.posts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.posts.is_empty()
    }

    pub fn get(&self, id: PostId) -> Option<&Post> {
        self.posts.iter().find(|post| post.id == id)
    }

    /// Insert at the front; an older entry with the same id is dropped.
    pub fn prepend(&mut self, post: Post) {
        self.posts.retain(|existing| existing.id != post.id);
        self.posts.insert(0, post);
    }

    /// Replace the entry with the same id in place. Returns `false` when absent.
    pub fn replace(&mut self, post: Post) -> bool {
        match self.posts.iter_mut().find(|existing| existing.id == post.id) {
            Some(slot) => {
                *slot = post;
                true
            }
            None => false,
        }
    }

    /// Remove the entry with `id`. Returns `false` when absent.
    pub fn remove(&mut self, id: PostId) -> bool {
        let before = self.posts.len();
        self.posts.retain(|post| post.id != id);
        self.posts.len() != before
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn post(id: PostId, title: &str) -> Post {
        Post {
            id,
            title: title.to_string(),
            body: format!("{title} Body"),
        }
    }

    fn seeded() -> PostList {
        PostList::from_response(vec![post(1, "Post One"), post(2, "Post Two")])
    }

    #[test]
    fn response_order_is_kept_and_duplicates_dropped() {
        let list = PostList::from_response(vec![post(2, "B"), post(1, "A"), post(2, "B again")]);
        let ids: Vec<_> = list.as_slice().iter().map(|p| p.id).collect();
        assert_eq!(ids, vec![2, 1]);
        assert_eq!(list.get(2).map(|p| p.title.as_str()), Some("B"));
    }

    #[test]
    fn prepend_puts_new_post_first() {
        let mut list = seeded();
        list.prepend(post(3, "Test Title"));
        assert_eq!(list.len(), 3);
        assert_eq!(list.as_slice()[0].id, 3);
    }

    #[test]
    fn prepend_of_known_id_keeps_ids_unique() {
        let mut list = seeded();
        list.prepend(post(2, "Moved"));
        let ids: Vec<_> = list.as_slice().iter().map(|p| p.id).collect();
        assert_eq!(ids, vec![2, 1]);
    }

    #[test]
    fn replace_keeps_position() {
        let mut list = seeded();
        assert!(list.replace(post(2, "Updated")));
        assert_eq!(list.as_slice()[1].title, "Updated");
        assert!(!list.replace(post(9, "Missing")));
        assert_eq!(list.len(), 2);
    }

    #[test]
    fn remove_drops_only_the_target() {
        let mut list = seeded();
        assert!(list.remove(1));
        assert_eq!(list.as_slice(), &[post(2, "Post Two")]);
        assert!(!list.remove(1));
    }
}
