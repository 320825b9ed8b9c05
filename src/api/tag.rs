//! Tag Management API
//!
//! Tags group enterprise members for bulk operations.
//!
//! # Endpoints
//!
//! - [`TagApi::create_tag`] - Create a tag
//! - [`TagApi::update_tag_name`] - Rename a tag
//! - [`TagApi::delete_tag`] - Delete a tag
//! - [`TagApi::list_tags`] - List all tags
//! - [`TagApi::get_tag_users`] - List members of a tag
//! - [`TagApi::add_tag_users`] - Add members to a tag
//! - [`TagApi::delete_tag_users`] - Remove members from a tag
//!
//! Partial failures on member changes come back in the body, e.g.
//! `{"errcode": 0, "errmsg": "invalid userlist failed", "invalidlist": "usr1|usr2"}`,
//! and `{"errcode": 40031, "errmsg": "all list invalid"}` when no userid was valid.

use std::sync::Arc;

use serde::Serialize;
use serde_json::Value;

use super::{WechatApi, WechatContext};
use crate::error::WechatError;

#[derive(Debug, Serialize)]
struct CreateTagRequest<'a> {
    tagname: &'a str,
}

#[derive(Debug, Serialize)]
struct UpdateTagRequest<'a> {
    tagid: u32,
    tagname: &'a str,
}

#[derive(Debug, Serialize)]
struct TagUsersRequest<'a> {
    tagid: u32,
    userlist: &'a [&'a str],
}

/// Tag Management API
pub struct TagApi {
    context: Arc<WechatContext>,
}

impl TagApi {
    /// Create a new TagApi instance
    pub fn new(context: Arc<WechatContext>) -> Self {
        Self { context }
    }

    /// Create a tag
    ///
    /// POST /cgi-bin/tag/create?access_token=ACCESS_TOKEN
    ///
    /// Success body: `{"errcode": 0, "errmsg": "created", "tagid": "1"}`
    pub async fn create_tag(&self, name: &str) -> Result<Value, WechatError> {
        let body = CreateTagRequest { tagname: name };
        self.context
            .post(self.api_name(), "/cgi-bin/tag/create", &body)
            .await
    }

    /// Rename a tag
    ///
    /// POST /cgi-bin/tag/update?access_token=ACCESS_TOKEN
    ///
    /// # Arguments
    /// * `tagid` - Tag ID
    /// * `name` - New name, up to 64 characters
    pub async fn update_tag_name(&self, tagid: u32, name: &str) -> Result<Value, WechatError> {
        let body = UpdateTagRequest {
            tagid,
            tagname: name,
        };
        self.context
            .post(self.api_name(), "/cgi-bin/tag/update", &body)
            .await
    }

    /// Delete a tag
    ///
    /// GET /cgi-bin/tag/delete?access_token=ACCESS_TOKEN&tagid=TAGID
    pub async fn delete_tag(&self, tagid: u32) -> Result<Value, WechatError> {
        let tagid = tagid.to_string();
        self.context
            .get(self.api_name(), "/cgi-bin/tag/delete", &[("tagid", tagid.as_str())])
            .await
    }

    /// List all tags
    ///
    /// GET /cgi-bin/tag/list?access_token=ACCESS_TOKEN
    pub async fn list_tags(&self) -> Result<Value, WechatError> {
        self.context
            .get(self.api_name(), "/cgi-bin/tag/list", &[])
            .await
    }

    /// List members of a tag
    ///
    /// GET /cgi-bin/tag/get?access_token=ACCESS_TOKEN&tagid=TAGID
    pub async fn get_tag_users(&self, tagid: u32) -> Result<Value, WechatError> {
        let tagid = tagid.to_string();
        self.context
            .get(self.api_name(), "/cgi-bin/tag/get", &[("tagid", tagid.as_str())])
            .await
    }

    /// Add members to a tag
    ///
    /// POST /cgi-bin/tag/addtagusers?access_token=ACCESS_TOKEN
    pub async fn add_tag_users(
        &self,
        tagid: u32,
        userlist: &[&str],
    ) -> Result<Value, WechatError> {
        let body = TagUsersRequest { tagid, userlist };
        self.context
            .post(self.api_name(), "/cgi-bin/tag/addtagusers", &body)
            .await
    }

    /// Remove members from a tag
    ///
    /// POST /cgi-bin/tag/deltagusers?access_token=ACCESS_TOKEN
    pub async fn delete_tag_users(
        &self,
        tagid: u32,
        userlist: &[&str],
    ) -> Result<Value, WechatError> {
        let body = TagUsersRequest { tagid, userlist };
        self.context
            .post(self.api_name(), "/cgi-bin/tag/deltagusers", &body)
            .await
    }
}

impl WechatApi for TagApi {
    fn context(&self) -> &WechatContext {
        &self.context
    }

    fn api_name(&self) -> &'static str {
        "tag"
    }
}
