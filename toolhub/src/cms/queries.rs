// This file is part of the product NoPressure.
// SPDX-FileCopyrightText: 2025-2026 Zivatar Limited
// SPDX-License-Identifier: AGPL-3.0-or-later
// The code and documentation in this repository is licensed under the GNU Affero General Public License v3.0 or later (AGPL-3.0-or-later). See LICENSE.

//! GraphQL documents. Every value travels in the variables map.

pub const TOOLS_OVERVIEW: &str = r#"
query ToolsOverview {
  tools {
    id
    name
    slug
    logo { url }
    description
    websiteUrl
    category { name slug }
    platform { name slug }
  }
  categories { name slug }
  platforms { name slug }
}"#;

pub const TOOL_BY_SLUG: &str = r#"
query ToolBySlug($slug: String!) {
  tool(where: { slug: $slug }) {
    id
    name
    slug
    logo { url }
    description
    features
    websiteUrl
    category { name slug }
    platform { name slug }
  }
}"#;

pub const LIST_POSTS: &str = r#"
query ListPosts {
  posts(orderBy: createdAt_DESC) {
    id
    title
    slug
    tag { name slug }
    author { name slug }
    createdAt
  }
}"#;

pub const POST_DETAIL: &str = r#"
query PostDetail($slug: String!) {
  post(where: { slug: $slug }) {
    id
    title
    slug
    content
    tag { name slug }
    author { name slug }
    createdAt
  }
}"#;

pub const TAG_WITH_POSTS: &str = r#"
query TagWithPosts($slug: String!) {
  tag(where: { slug: $slug }) {
    name
    slug
    post {
      id
      title
      slug
      author { name slug }
      createdAt
    }
  }
}"#;

pub const AUTHOR_WITH_POSTS: &str = r#"
query AuthorWithPosts($slug: String!) {
  author(where: { slug: $slug }) {
    name
    slug
    post {
      id
      title
      slug
      author { name slug }
      tag { name slug }
      createdAt
    }
  }
}"#;

pub const AUTHOR_PROFILE: &str = r#"
query AuthorProfile($email: String!) {
  author(where: { email: $email }) {
    id
    name
    slug
    email
    title
    bio
    website
    instagram
    facebook
    linkedin
    post {
      id
      title
      slug
      content
      tag { name slug }
      createdAt
    }
  }
}"#;

pub const AUTHOR_BY_EMAIL: &str = r#"
query AuthorByEmail($email: String!) {
  author(where: { email: $email }) {
    id
    name
    slug
    email
  }
}"#;

pub const CREATE_AUTHOR: &str = r#"
mutation CreateAuthor(
  $name: String!
  $slug: String!
  $email: String!
  $title: String
  $bio: String
  $website: String
  $instagram: String
  $facebook: String
  $linkedin: String
) {
  createAuthor(
    data: {
      name: $name
      slug: $slug
      email: $email
      title: $title
      bio: $bio
      website: $website
      instagram: $instagram
      facebook: $facebook
      linkedin: $linkedin
    }
  ) {
    id
    name
    slug
    email
  }
}"#;

pub const PUBLISH_AUTHOR: &str = r#"
mutation PublishAuthor($id: ID!) {
  publishAuthor(where: { id: $id }, to: PUBLISHED) { id }
}"#;

pub const TAGS_BY_NAMES: &str = r#"
query TagsByNames($names: [String!]) {
  tags(where: { name_in: $names }, stage: DRAFT, first: 100) {
    id
    name
    slug
    documentInStages(stages: PUBLISHED) { id }
  }
}"#;

pub const TAG_BY_SLUG: &str = r#"
query TagBySlug($slug: String!) {
  tag(where: { slug: $slug }, stage: DRAFT) {
    id
    name
    slug
    documentInStages(stages: PUBLISHED) { id }
  }
}"#;

pub const CREATE_TAG: &str = r#"
mutation CreateTag($name: String!, $slug: String!) {
  createTag(data: { name: $name, slug: $slug }) {
    id
    name
    slug
    documentInStages(stages: PUBLISHED) { id }
  }
}"#;

pub const PUBLISH_TAG: &str = r#"
mutation PublishTag($id: ID!) {
  publishTag(where: { id: $id }, to: PUBLISHED) { id }
}"#;

pub const POST_BY_SLUG: &str = r#"
query PostBySlug($slug: String!) {
  post(where: { slug: $slug }, stage: DRAFT) {
    id
    title
    slug
    tag { id name slug documentInStages(stages: PUBLISHED) { id } }
    author { id name slug email }
  }
}"#;

pub const CREATE_POST: &str = r#"
mutation CreatePost(
  $title: String!
  $slug: String!
  $content: String!
  $date: DateTime!
  $authorId: ID!
  $tags: [TagWhereUniqueInput!]
) {
  createPost(
    data: {
      title: $title
      slug: $slug
      content: $content
      date: $date
      author: { connect: { id: $authorId } }
      tag: { connect: $tags }
    }
  ) {
    id
    title
    slug
    tag { id name slug documentInStages(stages: PUBLISHED) { id } }
    author { id name slug email }
  }
}"#;

pub const UPDATE_POST: &str = r#"
mutation UpdatePost(
  $id: ID!
  $title: String!
  $slug: String!
  $content: String!
  $authorId: ID!
  $connect: [TagConnectInput!]
  $disconnect: [TagWhereUniqueInput!]
) {
  updatePost(
    where: { id: $id }
    data: {
      title: $title
      slug: $slug
      content: $content
      author: { connect: { id: $authorId } }
      tag: { connect: $connect, disconnect: $disconnect }
    }
  ) {
    id
    title
    slug
    tag { id name slug documentInStages(stages: PUBLISHED) { id } }
    author { id name slug email }
  }
}"#;

pub const PUBLISH_POST: &str = r#"
mutation PublishPost($id: ID!) {
  publishPost(where: { id: $id }, to: PUBLISHED) { id }
}"#;

pub const UNPUBLISH_POST: &str = r#"
mutation UnpublishPost($id: ID!) {
  unpublishPost(where: { id: $id }, from: PUBLISHED) { id }
}"#;

pub const DELETE_POST: &str = r#"
mutation DeletePost($id: ID!) {
  deletePost(where: { id: $id }) { id }
}"#;
