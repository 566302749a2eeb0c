//! Blog records
//!
//! Posts and authors refer to each other, so the generated file uses plain statics.

use structgen::Reflect;

#[derive(Debug, Reflect)]
pub struct Tag {
    pub id: &'static str,
    pub name: &'static str,
    pub slug: &'static str,
}

#[derive(Debug, Reflect)]
pub struct Author {
    pub id: &'static str,
    pub name: &'static str,
    pub post_ids: &'static [&'static str],
    #[structgen(source = "post_ids")]
    pub posts: &'static [&'static Post],
}

#[derive(Debug, Reflect)]
pub struct Post {
    pub id: &'static str,
    pub title: &'static str,
    pub word_count: u32,
    pub author_id: &'static str,
    #[structgen(source = "author_id")]
    pub author: Option<&'static Author>,
    pub tag_slugs: &'static [&'static str],
    #[structgen(source = "tag_slugs")]
    pub tags: &'static [&'static Tag],
}

pub fn tags() -> Vec<Tag> {
    vec![
        Tag {
            id: "t1",
            name: "Rust",
            slug: "rust",
        },
        Tag {
            id: "t2",
            name: "Code Generation",
            slug: "codegen",
        },
    ]
}

pub fn authors() -> Vec<Author> {
    vec![
        Author {
            id: "ada",
            name: "Ada",
            post_ids: &["hello-world", "static-data"],
            posts: &[],
        },
        Author {
            id: "grace",
            name: "Grace",
            post_ids: &[],
            posts: &[],
        },
    ]
}

pub fn posts() -> Vec<Post> {
    vec![
        Post {
            id: "hello-world",
            title: "Hello, World",
            word_count: 420,
            author_id: "ada",
            author: None,
            tag_slugs: &["rust"],
            tags: &[],
        },
        Post {
            id: "static-data",
            title: "Static Data Without Build Scripts",
            word_count: 1280,
            author_id: "ada",
            author: None,
            tag_slugs: &["rust", "codegen", "unknown"],
            tags: &[],
        },
    ]
}
