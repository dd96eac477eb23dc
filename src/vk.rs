use log::{info, warn};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use std::sync::Arc;
use url::Url;

const API_BASE: &str = "https://api.vk.com/method";
const API_VERSION: &str = "5.131";
/// VK API caps wall.get / wall.getComments at 100 items per request.
const PAGE_SIZE: usize = 100;

#[derive(Debug, thiserror::Error)]
pub enum VkError {
    #[error("invalid VK url: {0}")]
    InvalidUrl(String),
    #[error("VK API error {code}: {message}")]
    Api { code: i64, message: String },
    #[error("http error: {0}")]
    Http(#[from] reqwest::Error),
}

/// A wall post, as handed to the analysis layer.
#[derive(Debug, Clone)]
pub struct Post {
    pub owner_id: i64,
    pub post_id: i64,
    pub date: i64,
    pub text: String,
    pub comments_count: u64,
}

/// A comment under a wall post.
#[derive(Debug, Clone)]
pub struct Comment {
    pub author: String,
    pub date: i64,
    pub text: String,
}

// ---- wire types ----

#[derive(Debug, Deserialize)]
struct ApiEnvelope<T> {
    response: Option<T>,
    error: Option<ApiFault>,
}

#[derive(Debug, Deserialize)]
struct ApiFault {
    error_code: i64,
    error_msg: String,
}

#[derive(Debug, Deserialize)]
struct ItemsPage<T> {
    #[serde(default)]
    items: Vec<T>,
}

#[derive(Debug, Default, Deserialize)]
struct WallItem {
    owner_id: i64,
    id: i64,
    date: i64,
    #[serde(default)]
    text: String,
    #[serde(default)]
    comments: Option<CommentsInfo>,
}

#[derive(Debug, Default, Deserialize)]
struct CommentsInfo {
    #[serde(default)]
    count: u64,
}

#[derive(Debug, Default, Deserialize)]
struct CommentItem {
    #[serde(default)]
    from_id: i64,
    date: i64,
    #[serde(default)]
    text: String,
}

#[derive(Debug, Deserialize)]
struct GroupInfo {
    id: i64,
    #[serde(default)]
    name: String,
}

#[derive(Debug, Deserialize)]
struct UserInfo {
    #[serde(default)]
    first_name: String,
    #[serde(default)]
    last_name: String,
}

/// Asynchronous VK API client for public posts and comments.
///
/// Pages through `wall.get` / `wall.getComments` in chunks of at most 100
/// items until the requested count is reached or the wall is exhausted.
/// Optional progress reporting (0–100) via [`with_progress`](Self::with_progress).
#[derive(Clone)]
pub struct VkClient {
    http: reqwest::Client,
    token: String,
    progress: Option<Arc<dyn Fn(u8) + Send + Sync>>,
}

impl VkClient {
    pub fn new(token: impl Into<String>) -> Self {
        Self {
            http: reqwest::Client::new(),
            token: token.into(),
            progress: None,
        }
    }

    /// Registers a progress callback receiving a 0–100 percentage.
    pub fn with_progress<F>(mut self, callback: F) -> Self
    where
        F: Fn(u8) + Send + Sync + 'static,
    {
        self.progress = Some(Arc::new(callback));
        self
    }

    fn report_progress(&self, percent: u8) {
        if let Some(callback) = &self.progress {
            callback(percent.min(100));
        }
    }

    async fn call<T: DeserializeOwned>(
        &self,
        method: &str,
        params: &[(&str, String)],
    ) -> Result<T, VkError> {
        let mut query: Vec<(&str, String)> = params.to_vec();
        query.push(("access_token", self.token.clone()));
        query.push(("v", API_VERSION.to_string()));

        let envelope: ApiEnvelope<T> = self
            .http
            .get(format!("{API_BASE}/{method}"))
            .query(&query)
            .send()
            .await?
            .json()
            .await?;

        if let Some(fault) = envelope.error {
            return Err(VkError::Api {
                code: fault.error_code,
                message: fault.error_msg,
            });
        }
        envelope.response.ok_or_else(|| VkError::Api {
            code: 0,
            message: format!("{method} returned an empty response"),
        })
    }

    async fn resolve_group_id(&self, screen_name: &str) -> Result<i64, VkError> {
        let groups: Vec<GroupInfo> = self
            .call("groups.getById", &[("group_id", screen_name.to_string())])
            .await?;
        groups.first().map(|g| g.id).ok_or_else(|| VkError::Api {
            code: 0,
            message: format!("group '{screen_name}' not found"),
        })
    }

    /// Fetches up to `max_count` posts from a group's wall.
    ///
    /// `group_url` is a public group link, e.g. `https://vk.com/themovieblog`.
    pub async fn get_posts(&self, group_url: &str, max_count: usize) -> Result<Vec<Post>, VkError> {
        info!("Loading posts for group: {}", group_url);
        let screen_name = parse_group_screen_name(group_url)?;
        let group_id = self.resolve_group_id(&screen_name).await?;

        let mut posts = Vec::new();
        let mut offset = 0usize;
        let count_per_request = max_count.min(PAGE_SIZE);

        while offset < max_count {
            self.report_progress(((offset * 100) / max_count.max(1)) as u8);
            let page: ItemsPage<WallItem> = self
                .call(
                    "wall.get",
                    &[
                        ("owner_id", (-group_id).to_string()),
                        ("count", count_per_request.to_string()),
                        ("offset", offset.to_string()),
                    ],
                )
                .await?;

            let page_len = page.items.len();
            if page_len == 0 {
                break;
            }

            for item in page.items {
                posts.push(Post {
                    owner_id: item.owner_id,
                    post_id: item.id,
                    date: item.date,
                    text: item.text,
                    comments_count: item.comments.map(|c| c.count).unwrap_or(0),
                });
                if posts.len() >= max_count {
                    break;
                }
            }

            offset += count_per_request;
            if posts.len() >= max_count || page_len < count_per_request {
                break;
            }
        }

        self.report_progress(100);
        info!("Loaded {} posts", posts.len());
        Ok(posts)
    }

    /// Fetches up to `max_count` comments under a post.
    ///
    /// `post_url` is a wall post link, e.g. `https://vk.com/wall-12345_678`.
    pub async fn get_comments(
        &self,
        post_url: &str,
        max_count: usize,
    ) -> Result<Vec<Comment>, VkError> {
        info!("Loading comments for post: {}", post_url);
        let (owner_id, post_id) = parse_wall_post_id(post_url)?;

        let mut comments = Vec::new();
        let mut offset = 0usize;
        let count_per_request = max_count.min(PAGE_SIZE);

        while offset < max_count {
            self.report_progress(((offset * 100) / max_count.max(1)) as u8);
            let page: ItemsPage<CommentItem> = self
                .call(
                    "wall.getComments",
                    &[
                        ("owner_id", owner_id.to_string()),
                        ("post_id", post_id.to_string()),
                        ("count", count_per_request.to_string()),
                        ("offset", offset.to_string()),
                        ("need_likes", "0".to_string()),
                        ("preview_length", "0".to_string()),
                    ],
                )
                .await?;

            let page_len = page.items.len();
            if page_len == 0 {
                break;
            }

            for item in page.items {
                let author = self.resolve_author(item.from_id).await;
                comments.push(Comment {
                    author,
                    date: item.date,
                    text: item.text,
                });
                if comments.len() >= max_count {
                    break;
                }
            }

            offset += count_per_request;
            if comments.len() >= max_count || page_len < count_per_request {
                break;
            }
        }

        self.report_progress(100);
        info!("Loaded {} comments", comments.len());
        Ok(comments)
    }

    /// Resolves a comment author's display name; failures degrade to "Unknown".
    async fn resolve_author(&self, from_id: i64) -> String {
        let resolved = if from_id > 0 {
            self.call::<Vec<UserInfo>>("users.get", &[("user_ids", from_id.to_string())])
                .await
                .map(|users| {
                    users
                        .first()
                        .map(|u| format!("{} {}", u.first_name, u.last_name).trim().to_string())
                        .unwrap_or_default()
                })
        } else if from_id < 0 {
            self.call::<Vec<GroupInfo>>("groups.getById", &[("group_id", (-from_id).to_string())])
                .await
                .map(|groups| groups.first().map(|g| g.name.clone()).unwrap_or_default())
        } else {
            return "Unknown".to_string();
        };

        match resolved {
            Ok(name) if !name.is_empty() => name,
            Ok(_) => "Unknown".to_string(),
            Err(e) => {
                warn!("Failed to resolve comment author {}: {}", from_id, e);
                "Unknown".to_string()
            }
        }
    }
}

/// Extracts a group screen name from a public group link.
fn parse_group_screen_name(group_url: &str) -> Result<String, VkError> {
    let parsed = Url::parse(group_url).map_err(|_| VkError::InvalidUrl(group_url.to_string()))?;
    let path = parsed.path().trim_matches('/');
    if path.is_empty() || path.contains('/') {
        return Err(VkError::InvalidUrl(group_url.to_string()));
    }
    Ok(path.to_string())
}

/// Extracts `(owner_id, post_id)` from a wall post link like `/wall-123_456`.
fn parse_wall_post_id(post_url: &str) -> Result<(i64, i64), VkError> {
    let parsed = Url::parse(post_url).map_err(|_| VkError::InvalidUrl(post_url.to_string()))?;
    let path = parsed.path().trim_matches('/');
    let rest = path
        .strip_prefix("wall")
        .ok_or_else(|| VkError::InvalidUrl(post_url.to_string()))?;
    let (owner, post) = rest
        .split_once('_')
        .ok_or_else(|| VkError::InvalidUrl(post_url.to_string()))?;

    let owner_id = owner
        .parse::<i64>()
        .map_err(|_| VkError::InvalidUrl(post_url.to_string()))?;
    let post_id = post
        .parse::<i64>()
        .map_err(|_| VkError::InvalidUrl(post_url.to_string()))?;
    Ok((owner_id, post_id))
}
