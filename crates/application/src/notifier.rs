//! 推送通知契约
//!
//! 推送是尽力而为的扇出：分发结果以成功/失败计数返回，
//! 永远不会向触发它的内容写入操作抛出错误。

use async_trait::async_trait;
use std::collections::HashMap;

/// 推送消息内容
#[derive(Debug, Clone, PartialEq)]
pub struct PushMessage {
    pub title: String,
    pub body: String,
    pub data: HashMap<String, String>,
}

impl PushMessage {
    /// 新帖子通知
    pub fn new_post(post_id: &str, post_title: &str, author_name: &str) -> Self {
        let mut data = HashMap::new();
        data.insert("type".to_string(), "new_post".to_string());
        data.insert("post_id".to_string(), post_id.to_string());
        data.insert("author".to_string(), author_name.to_string());
        Self {
            title: "New post".to_string(),
            body: format!("{} published: {}", author_name, post_title),
            data,
        }
    }

    /// 新故事通知
    pub fn new_story(story_id: &str, author_name: &str) -> Self {
        let mut data = HashMap::new();
        data.insert("type".to_string(), "new_story".to_string());
        data.insert("story_id".to_string(), story_id.to_string());
        data.insert("author".to_string(), author_name.to_string());
        Self {
            title: "New story".to_string(),
            body: format!("{} published a new story", author_name),
            data,
        }
    }
}

/// 多播分发结果
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct DeliveryReport {
    pub success_count: usize,
    pub failure_count: usize,
}

#[async_trait]
pub trait PushNotifier: Send + Sync {
    /// 向一组设备 token 多播；单个设备失败计入 failure_count，不中断其余分发
    async fn send_multicast(&self, tokens: &[String], message: PushMessage) -> DeliveryReport;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_post_message() {
        let message = PushMessage::new_post("64f000000000000000000001", "Launch", "Host");
        assert_eq!(message.title, "New post");
        assert_eq!(message.body, "Host published: Launch");
        assert_eq!(message.data.get("type").map(String::as_str), Some("new_post"));
        assert_eq!(
            message.data.get("post_id").map(String::as_str),
            Some("64f000000000000000000001")
        );
    }

    #[test]
    fn test_new_story_message() {
        let message = PushMessage::new_story("64f000000000000000000002", "Host");
        assert_eq!(message.data.get("type").map(String::as_str), Some("new_story"));
        assert_eq!(message.body, "Host published a new story");
    }
}
