//! Request/Response DTOs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use social_db::{Follow, Post, User};

// ==================== Auth Types ====================

/// Registration request (also used by `POST /users`)
#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisterRequest {
    pub username: String,
    pub password: String,
    pub full_name: String,
    pub email: String,
}

/// Login request
#[derive(Deserialize)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

/// Login response
#[derive(Serialize, Deserialize)]
pub struct LoginResponse {
    pub payload: TokenPayload,
}

/// Issued session token
#[derive(Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TokenPayload {
    pub token: String,
    pub username: String,
    pub issued_at: DateTime<Utc>,
    pub expired_at: DateTime<Utc>,
}

// ==================== User Types ====================

/// Update user request
#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateUserRequest {
    #[serde(default)]
    pub password: Option<String>,
    #[serde(default)]
    pub full_name: Option<String>,
}

/// User response (without password)
#[derive(Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserResponse {
    pub id: i64,
    pub username: String,
    pub full_name: String,
    pub email: String,
    pub created_at: DateTime<Utc>,
}

impl From<User> for UserResponse {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            username: user.username,
            full_name: user.full_name,
            email: user.email,
            created_at: user.created_at,
        }
    }
}

// ==================== Post Types ====================

/// Create post request
#[derive(Deserialize)]
pub struct CreatePostRequest {
    pub title: String,
    pub body: String,
    #[serde(rename = "userID")]
    pub user_id: i64,
    pub status: String,
}

/// Update post request
#[derive(Deserialize)]
pub struct UpdatePostRequest {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub body: Option<String>,
    #[serde(default)]
    pub status: Option<String>,
}

/// Post response
#[derive(Serialize, Deserialize)]
pub struct PostResponse {
    #[serde(rename = "postID")]
    pub id: i64,
    pub title: String,
    pub body: String,
    #[serde(rename = "userID")]
    pub user_id: i64,
    pub status: String,
    #[serde(rename = "createdAt")]
    pub created_at: DateTime<Utc>,
}

impl From<Post> for PostResponse {
    fn from(post: Post) -> Self {
        Self {
            id: post.id,
            title: post.title,
            body: post.body,
            user_id: post.user_id,
            status: post.status,
            created_at: post.created_at,
        }
    }
}

// ==================== Follow Types ====================

/// Follow edge response
#[derive(Serialize, Deserialize)]
pub struct FollowResponse {
    #[serde(rename = "followingUserID")]
    pub following_user_id: i64,
    #[serde(rename = "followerUserID")]
    pub follower_user_id: i64,
    #[serde(rename = "createdAt")]
    pub created_at: DateTime<Utc>,
}

impl From<Follow> for FollowResponse {
    fn from(follow: Follow) -> Self {
        Self {
            following_user_id: follow.following_user_id,
            follower_user_id: follow.follower_user_id,
            created_at: follow.created_at,
        }
    }
}
