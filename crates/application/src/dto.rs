//! 应用层输出模型

use domain::{Comment, Like, Post, Story};
use serde::Serialize;

/// 读取时充实的帖子视图
///
/// 点赞者 id 列表与评论列表在每次读取时从各自集合重新计算，
/// 属于瞬态数据，永远不会写回帖子文档。
#[derive(Debug, Clone, Serialize)]
pub struct PostDetails {
    #[serde(flatten)]
    pub post: Post,
    pub likes: Vec<String>,
    pub comments: Vec<Comment>,
}

impl PostDetails {
    /// 组装充实视图并用实际记录数覆盖非规范化计数
    pub fn assemble(mut post: Post, likes: Vec<Like>, comments: Vec<Comment>) -> Self {
        post.likes_count = likes.len() as i64;
        post.comments_count = comments.len() as i64;
        Self {
            post,
            likes: likes.into_iter().map(|like| like.user_id).collect(),
            comments,
        }
    }
}

/// 浏览故事的结果
#[derive(Debug, Clone, Serialize)]
pub struct StoryViewed {
    pub story: Story,
    pub time_remaining_hours: i64,
}
