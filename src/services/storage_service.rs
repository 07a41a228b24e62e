// src/services/storage_service.rs

use std::path::PathBuf;

use uuid::Uuid;

use crate::{common::error::AppError, models::storage::StoredFile};

pub const PRODUCT_IMAGES_BUCKET: &str = "product-images";
pub const PUBLIC_PREFIX: &str = "/storage";

const IMAGE_EXTENSIONS: [&str; 5] = ["png", "jpg", "jpeg", "gif", "webp"];

/// Extensão do arquivo: primeiro pelo nome, depois pelo Content-Type.
pub fn image_extension(filename: Option<&str>, content_type: Option<&str>) -> Result<&'static str, AppError> {
    let from_name = filename
        .and_then(|name| name.rsplit_once('.'))
        .map(|(_, ext)| ext.to_ascii_lowercase());

    let from_mime = content_type.and_then(|mime| {
        match mime.split(';').next().unwrap_or_default().trim() {
            "image/png" => Some("png"),
            "image/jpeg" | "image/jpg" => Some("jpg"),
            "image/gif" => Some("gif"),
            "image/webp" => Some("webp"),
            _ => None,
        }
    });

    let candidate = match from_name {
        Some(ext) => IMAGE_EXTENSIONS.iter().copied().find(|allowed| *allowed == ext),
        None => from_mime,
    };

    candidate.ok_or_else(|| {
        AppError::field(
            "filename",
            "image_type",
            "Envie uma imagem PNG, JPG, GIF ou WEBP.",
        )
    })
}

#[derive(Clone)]
pub struct StorageService {
    root: PathBuf,
    public_base_url: String,
}

impl StorageService {
    pub fn new(root: impl Into<PathBuf>, public_base_url: &str) -> Self {
        Self {
            root: root.into(),
            public_base_url: public_base_url.trim_end_matches('/').to_string(),
        }
    }

    pub fn root(&self) -> &PathBuf {
        &self.root
    }

    /// Grava a imagem em `<raiz>/product-images/<perfil>/<uuid>.<ext>`.
    pub async fn store_product_image(
        &self,
        profile_id: Uuid,
        filename: Option<&str>,
        content_type: Option<&str>,
        bytes: &[u8],
    ) -> Result<StoredFile, AppError> {
        if bytes.is_empty() {
            return Err(AppError::field("file", "required", "O arquivo está vazio."));
        }

        let extension = image_extension(filename, content_type)?;

        let relative = format!(
            "{}/{}/{}.{}",
            PRODUCT_IMAGES_BUCKET,
            profile_id,
            Uuid::new_v4(),
            extension
        );

        let target = self.root.join(&relative);
        if let Some(dir) = target.parent() {
            tokio::fs::create_dir_all(dir).await?;
        }
        tokio::fs::write(&target, bytes).await?;

        tracing::info!(path = %relative, size = bytes.len(), "🖼️ Imagem armazenada");

        Ok(StoredFile {
            url: format!("{}{}/{}", self.public_base_url, PUBLIC_PREFIX, relative),
            path: relative,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extension_comes_from_filename() {
        assert_eq!(image_extension(Some("Foto.PNG"), None).unwrap(), "png");
        assert_eq!(image_extension(Some("a.b.jpeg"), Some("image/png")).unwrap(), "jpeg");
    }

    #[test]
    fn test_extension_falls_back_to_content_type() {
        assert_eq!(image_extension(None, Some("image/webp")).unwrap(), "webp");
        assert_eq!(image_extension(Some("sem-extensao"), Some("image/jpeg; q=1")).unwrap(), "jpg");
    }

    #[test]
    fn test_non_images_are_rejected() {
        assert!(image_extension(Some("planilha.xlsx"), Some("image/png")).is_err());
        assert!(image_extension(None, Some("application/pdf")).is_err());
        assert!(image_extension(None, None).is_err());
    }

    #[tokio::test]
    async fn test_stores_file_under_profile_folder() {
        let root = std::env::temp_dir().join(format!("cotaimport-test-{}", Uuid::new_v4()));
        let storage = StorageService::new(&root, "http://localhost:3000/");
        let profile_id = Uuid::new_v4();

        let stored = storage
            .store_product_image(profile_id, Some("fone.png"), None, b"\x89PNG fake")
            .await
            .unwrap();

        let prefix = format!("product-images/{}/", profile_id);
        assert!(stored.path.starts_with(&prefix));
        assert!(stored.path.ends_with(".png"));
        assert_eq!(stored.url, format!("http://localhost:3000/storage/{}", stored.path));

        let written = tokio::fs::read(root.join(&stored.path)).await.unwrap();
        assert_eq!(written, b"\x89PNG fake");

        tokio::fs::remove_dir_all(&root).await.unwrap();
    }

    #[tokio::test]
    async fn test_empty_upload_is_rejected() {
        let storage = StorageService::new(std::env::temp_dir(), "http://localhost:3000");
        let result = storage
            .store_product_image(Uuid::new_v4(), Some("a.png"), None, b"")
            .await;
        assert!(matches!(result, Err(AppError::ValidationError(_))));
    }
}
