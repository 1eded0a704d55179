//! MongoDB 访问层
//!
//! 每种实体映射为一个以复数命名的扁平文档集合；文档中的引用
//! 一律存储为字符串 id，读取时的充实数据不会写回文档。

pub mod documents;
pub mod repositories;
pub mod repository;

use domain::{RepositoryError, RepositoryResult};
use mongodb::bson::doc;
use mongodb::{Client, Database};

/// MongoDB 数据库句柄；克隆成本低，可在各仓储间共享
#[derive(Clone)]
pub struct MongoStore {
    database: Database,
}

impl MongoStore {
    /// 连接数据库并通过 ping 确认可达
    pub async fn connect(url: &str, database_name: &str) -> RepositoryResult<Self> {
        let client = Client::with_uri_str(url)
            .await
            .map_err(|err| RepositoryError::storage(err.to_string()))?;
        let database = client.database(database_name);

        database
            .run_command(doc! {"ping": 1})
            .await
            .map_err(|err| RepositoryError::storage(err.to_string()))?;

        tracing::info!(database = %database_name, "connected to MongoDB");
        Ok(Self { database })
    }

    pub fn database(&self) -> &Database {
        &self.database
    }

    /// 健康检查用的可达性探测
    pub async fn ping(&self) -> bool {
        self.database.run_command(doc! {"ping": 1}).await.is_ok()
    }
}
