//! Success envelope.

use salvo::oapi::ToSchema;
use serde::{Deserialize, Serialize};

use topup_app::pagination::Paginated;

/// `{ success: true, message, data }`
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct Envelope<T: ToSchema + 'static> {
    pub success: bool,
    pub message: String,
    pub data: T,
}

impl<T: ToSchema + 'static> Envelope<T> {
    pub(crate) fn ok(message: impl Into<String>, data: T) -> Self {
        Self {
            success: true,
            message: message.into(),
            data,
        }
    }
}

/// Success without a payload.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct Acknowledgement {
    pub success: bool,
    pub message: String,
}

impl Acknowledgement {
    pub(crate) fn ok(message: impl Into<String>) -> Self {
        Self {
            success: true,
            message: message.into(),
        }
    }
}

/// One page of a list endpoint.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub(crate) struct PageResponse<T: ToSchema + 'static> {
    pub items: Vec<T>,
    pub page: u32,
    pub page_size: u32,
    pub total: u64,
    pub total_pages: u64,
}

impl<T: ToSchema + 'static> PageResponse<T> {
    pub(crate) fn from_paginated<R>(paginated: Paginated<R>) -> Self
    where
        T: From<R>,
    {
        let total_pages = paginated.total_pages();
        let page = paginated.page;

        Self {
            total: paginated.total,
            total_pages,
            page: page.number,
            page_size: page.size,
            items: paginated.items.into_iter().map(T::from).collect(),
        }
    }
}
