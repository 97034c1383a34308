//! Blog-publishing facade over the XML-RPC client.
//!
//! Maps publishing concepts (post status, comment status, categories)
//! onto the parameter lists of three WordPress XML-RPC methods:
//!
//! | method | used by |
//! |---|---|
//! | `metaWeblog.newPost` | [`WordPressClient::new_post`] |
//! | `wp.getCategories` | [`WordPressClient::categories`] |
//! | `wp.getProfile` | [`WordPressClient::validate_user`] |
//!
//! Credentials travel as two ordinary string parameters; there is no
//! other authentication.

use serde::{Deserialize, Serialize};

use pressrpc_protocol::{Native, Value};
use pressrpc_transport::Transport;

use crate::{Error, XmlRpcClient};

/// Blog id sent with every call. Single-site installs ignore it.
pub const DEFAULT_BLOG_ID: i64 = 1;

/// Whether a new post is published right away.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PostStatus {
    #[default]
    Draft,
    Publish,
}

/// Whether readers may comment on a new post.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CommentStatus {
    #[default]
    Open,
    Closed,
}

/// Username and password, sent as plain call parameters.
#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
    pub username: String,
    pub password: String,
}

impl Credentials {
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            password: password.into(),
        }
    }
}

/// Keeps the password out of logs.
impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials")
            .field("username", &self.username)
            .field("password", &"***")
            .finish()
    }
}

/// Per-post publishing options.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PostParams {
    pub status: PostStatus,
    pub comment_status: CommentStatus,
    /// Category ids, as returned by [`WordPressClient::categories`].
    pub categories: Vec<i64>,
}

/// One entry of `wp.getCategories`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Category {
    #[serde(rename = "categoryId")]
    pub id: String,
    #[serde(default)]
    pub parent_id: String,
    #[serde(rename = "categoryName")]
    pub name: String,
    #[serde(default, rename = "categoryDescription")]
    pub description: String,
    #[serde(default)]
    pub html_url: String,
    #[serde(default)]
    pub rss_url: String,
}

/// The `content_struct` of `metaWeblog.newPost`.
#[derive(Serialize)]
struct NewPost<'a> {
    post_type: &'static str,
    post_status: PostStatus,
    mt_allow_comments: CommentStatus,
    title: &'a str,
    description: &'a str,
    categories: &'a [i64],
}

/// A WordPress site reached over XML-RPC.
///
/// Every method prepends the same three parameters (blog id, username,
/// password) and lifts a remote fault into [`Error::Fault`], so a refused
/// login shows up as an `Err` rather than a value to inspect.
///
/// # Example
///
/// ```rust,no_run
/// use pressrpc::prelude::*;
///
/// # async fn run() -> Result<(), pressrpc::Error> {
/// let client = XmlRpcClient::builder()
///     .base_url("https://blog.example.com")
///     .build()?;
/// let wp = WordPressClient::new(client);
/// let creds = Credentials::new("admin", "secret");
///
/// let params = PostParams {
///     status: PostStatus::Publish,
///     ..PostParams::default()
/// };
/// let id = wp.new_post(&creds, "Hello", "<p>First post</p>", &params).await?;
/// println!("created post {id}");
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct WordPressClient<T> {
    client: XmlRpcClient<T>,
    blog_id: i64,
}

impl<T: Transport> WordPressClient<T> {
    pub fn new(client: XmlRpcClient<T>) -> Self {
        Self {
            client,
            blog_id: DEFAULT_BLOG_ID,
        }
    }

    /// Overrides the blog id sent with each call.
    pub fn with_blog_id(mut self, blog_id: i64) -> Self {
        self.blog_id = blog_id;
        self
    }

    pub fn client(&self) -> &XmlRpcClient<T> {
        &self.client
    }

    /// Creates a post and returns what the server sends back (the new
    /// post's id).
    ///
    /// # Errors
    /// `Error::Fault` when the server refuses, e.g. on bad credentials.
    pub async fn new_post(
        &self,
        credentials: &Credentials,
        title: &str,
        content: &str,
        params: &PostParams,
    ) -> Result<Value, Error> {
        let post = Native::from_serialize(&NewPost {
            post_type: "post",
            post_status: params.status,
            mt_allow_comments: params.comment_status,
            title,
            description: content,
            categories: &params.categories,
        })?;
        let mut args = self.auth_params(credentials);
        args.push(post);
        args.push(Native::Bool(true));

        let value = self.client.call_value("metaWeblog.newPost", args).await?;
        tracing::info!(post = %value, "post created");
        Ok(value)
    }

    /// Lists the site's categories.
    pub async fn categories(&self, credentials: &Credentials) -> Result<Vec<Category>, Error> {
        let value = self
            .client
            .call_value("wp.getCategories", self.auth_params(credentials))
            .await?;
        Ok(value.deserialize_into()?)
    }

    /// Checks that the credentials are accepted, returning the user's
    /// profile struct.
    pub async fn validate_user(&self, credentials: &Credentials) -> Result<Value, Error> {
        self.client
            .call_value("wp.getProfile", self.auth_params(credentials))
            .await
    }

    /// `blog_id, username, password`: the common prefix of every call.
    fn auth_params(&self, credentials: &Credentials) -> Vec<Native> {
        vec![
            Native::Int(self.blog_id),
            Native::from(credentials.username.as_str()),
            Native::from(credentials.password.as_str()),
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_credentials_debug_hides_password() {
        let creds = Credentials::new("admin", "hunter2");
        let debug = format!("{creds:?}");
        assert!(debug.contains("admin"));
        assert!(!debug.contains("hunter2"));
    }

    #[test]
    fn test_post_params_default_is_open_draft() {
        let params = PostParams::default();
        assert_eq!(params.status, PostStatus::Draft);
        assert_eq!(params.comment_status, CommentStatus::Open);
        assert!(params.categories.is_empty());
    }

    #[test]
    fn test_new_post_struct_shape() {
        let native = Native::from_serialize(&NewPost {
            post_type: "post",
            post_status: PostStatus::Publish,
            mt_allow_comments: CommentStatus::Closed,
            title: "Hello",
            description: "<p>World</p>",
            categories: &[1, 2],
        })
        .unwrap();
        let value = pressrpc_protocol::encode(native);

        assert_eq!(value.get("post_type"), Some(&Value::String("post".into())));
        assert_eq!(value.get("post_status"), Some(&Value::String("publish".into())));
        assert_eq!(value.get("mt_allow_comments"), Some(&Value::String("closed".into())));
        assert_eq!(
            value.get("categories"),
            Some(&Value::Array(vec![Value::Integer(1), Value::Integer(2)]))
        );
    }
}
