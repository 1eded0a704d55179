//! 通用文档仓储
//!
//! 所有集合共享的 CRUD 原语。id 一律使用十六进制 ObjectId 字符串，
//! 格式非法按"未找到"处理而不是报错；每次更新都会盖章 `updated_at`。
//! 没有事务：跨集合的多步写入（点赞记录 + 计数）不具备原子性。

use futures_util::TryStreamExt;
use mongodb::bson::{doc, oid::ObjectId, DateTime, Document};
use mongodb::options::ReturnDocument;
use mongodb::Collection;
use serde::de::DeserializeOwned;
use serde::Serialize;

use domain::{RepositoryError, RepositoryResult};

pub(crate) fn storage_error(err: mongodb::error::Error) -> RepositoryError {
    RepositoryError::storage(err.to_string())
}

/// 解析十六进制 ObjectId；非法格式返回 None
pub(crate) fn parse_object_id(id: &str) -> Option<ObjectId> {
    ObjectId::parse_str(id).ok()
}

pub struct DocumentRepository<D: Send + Sync> {
    collection: Collection<D>,
}

impl<D> DocumentRepository<D>
where
    D: Serialize + DeserializeOwned + Unpin + Send + Sync,
{
    pub fn new(collection: Collection<D>) -> Self {
        Self { collection }
    }

    /// 插入文档并返回存储层分配的 id
    pub async fn insert(&self, document: &D) -> RepositoryResult<ObjectId> {
        let result = self
            .collection
            .insert_one(document)
            .await
            .map_err(storage_error)?;

        result
            .inserted_id
            .as_object_id()
            .ok_or_else(|| RepositoryError::storage("inserted id is not an ObjectId"))
    }

    pub async fn find_by_id(&self, id: &str) -> RepositoryResult<Option<D>> {
        let Some(oid) = parse_object_id(id) else {
            return Ok(None);
        };
        self.collection
            .find_one(doc! {"_id": oid})
            .await
            .map_err(storage_error)
    }

    pub async fn find_one(&self, filter: Document) -> RepositoryResult<Option<D>> {
        self.collection
            .find_one(filter)
            .await
            .map_err(storage_error)
    }

    pub async fn find_all(&self, skip: u64, limit: i64) -> RepositoryResult<Vec<D>> {
        self.find(Document::new(), skip, limit, None).await
    }

    /// 条件分页查询，可选排序
    pub async fn find(
        &self,
        filter: Document,
        skip: u64,
        limit: i64,
        sort: Option<Document>,
    ) -> RepositoryResult<Vec<D>> {
        let mut action = self.collection.find(filter).skip(skip).limit(limit);
        if let Some(sort) = sort {
            action = action.sort(sort);
        }

        let cursor = action.await.map_err(storage_error)?;
        cursor.try_collect().await.map_err(storage_error)
    }

    /// 按操作符文档（$set / $inc）更新，总是在 $set 中盖章 updated_at，
    /// 返回更新后的文档
    pub async fn update(&self, id: &str, mut update: Document) -> RepositoryResult<Option<D>> {
        let Some(oid) = parse_object_id(id) else {
            return Ok(None);
        };

        let mut set = update.get_document("$set").ok().cloned().unwrap_or_default();
        set.insert("updated_at", DateTime::now());
        update.insert("$set", set);

        self.collection
            .find_one_and_update(doc! {"_id": oid}, update)
            .return_document(ReturnDocument::After)
            .await
            .map_err(storage_error)
    }

    /// 条件批量更新，返回修改数量
    pub async fn update_many(&self, filter: Document, update: Document) -> RepositoryResult<u64> {
        let result = self
            .collection
            .update_many(filter, update)
            .await
            .map_err(storage_error)?;
        Ok(result.modified_count)
    }

    pub async fn delete(&self, id: &str) -> RepositoryResult<bool> {
        let Some(oid) = parse_object_id(id) else {
            return Ok(false);
        };
        let result = self
            .collection
            .delete_one(doc! {"_id": oid})
            .await
            .map_err(storage_error)?;
        Ok(result.deleted_count > 0)
    }

    pub async fn exists(&self, id: &str) -> RepositoryResult<bool> {
        let Some(oid) = parse_object_id(id) else {
            return Ok(false);
        };
        Ok(self.count(doc! {"_id": oid}).await? > 0)
    }

    pub async fn count(&self, filter: Document) -> RepositoryResult<u64> {
        self.collection
            .count_documents(filter)
            .await
            .map_err(storage_error)
    }
}
