// src/models/storage.rs

use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

#[derive(Debug, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct UploadQuery {
    /// Nome original do arquivo (a extensão define o tipo)
    pub filename: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct StoredFile {
    #[schema(example = "product-images/4f0c.../0b7e....png")]
    pub path: String,
    #[schema(example = "http://localhost:3000/storage/product-images/4f0c.../0b7e....png")]
    pub url: String,
}
