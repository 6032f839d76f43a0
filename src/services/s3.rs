use async_trait::async_trait;
use aws_sdk_s3::primitives::ByteStream;
use aws_sdk_s3::Client;

use crate::config::Config;
use crate::error::AppError;
use crate::models::media::{MediaDescriptor, ResourceType};
use crate::services::media::{MediaStore, MediaUpload};

/// Entry media kept in an S3-compatible bucket with public-read objects.
#[derive(Clone)]
pub struct S3MediaStore {
    client: Client,
    pub bucket_name: String,
    region: String,
    endpoint: Option<String>,
    folder: String,
}

impl S3MediaStore {
    pub fn new(config: &Config) -> Self {
        let credentials = aws_sdk_s3::config::Credentials::new(
            config.aws_access_key_id.clone(),
            config.aws_secret_access_key.clone(),
            None,
            None,
            "manual_config",
        );

        let region = aws_sdk_s3::config::Region::new(config.aws_region.clone());

        let mut s3_config_builder = aws_sdk_s3::config::Builder::new()
            .behavior_version(aws_sdk_s3::config::BehaviorVersion::latest())
            .region(region)
            .credentials_provider(credentials);

        if let Some(endpoint) = &config.s3_endpoint {
            s3_config_builder = s3_config_builder
                .endpoint_url(endpoint)
                .force_path_style(true);
        }

        Self {
            client: Client::from_conf(s3_config_builder.build()),
            bucket_name: config.s3_bucket_name.clone(),
            region: config.aws_region.clone(),
            endpoint: config.s3_endpoint.clone(),
            folder: config.media_folder.clone(),
        }
    }

    pub fn public_url(&self, key: &str) -> String {
        match &self.endpoint {
            Some(endpoint) => format!("{}/{}/{}", endpoint, self.bucket_name, key),
            None => format!(
                "https://{}.s3.{}.amazonaws.com/{}",
                self.bucket_name, self.region, key
            ),
        }
    }

    pub async fn ensure_bucket_exists(&self) -> Result<(), AppError> {
        let resp = self.client.head_bucket().bucket(&self.bucket_name).send().await;

        if resp.is_err() {
            tracing::info!(bucket = %self.bucket_name, "bucket does not exist, creating");
            self.client
                .create_bucket()
                .bucket(&self.bucket_name)
                .send()
                .await
                .map_err(|e| {
                    tracing::error!(error = ?e, "failed to create bucket");
                    AppError::Storage(format!("Failed to create S3 bucket: {}", e))
                })?;
        }

        self.set_public_policy().await
    }

    async fn set_public_policy(&self) -> Result<(), AppError> {
        let policy = format!(
            r#"{{
                "Version": "2012-10-17",
                "Statement": [
                    {{
                        "Sid": "PublicReadGetObject",
                        "Effect": "Allow",
                        "Principal": "*",
                        "Action": "s3:GetObject",
                        "Resource": "arn:aws:s3:::{}/*"
                    }}
                ]
            }}"#,
            self.bucket_name
        );

        self.client
            .put_bucket_policy()
            .bucket(&self.bucket_name)
            .policy(policy)
            .send()
            .await
            .map_err(|e| {
                tracing::error!(error = ?e, "failed to set bucket policy");
                AppError::Storage(format!("Failed to set bucket policy: {}", e))
            })?;

        Ok(())
    }
}

#[async_trait]
impl MediaStore for S3MediaStore {
    async fn upload(&self, upload: &MediaUpload) -> Result<MediaDescriptor, AppError> {
        let millis = chrono::Utc::now().timestamp_millis();
        let key = object_key(&self.folder, upload.resource_type(), &upload.filename, millis);

        self.client
            .put_object()
            .bucket(&self.bucket_name)
            .key(&key)
            .body(ByteStream::from(upload.data.clone()))
            .content_type(&upload.content_type)
            .acl(aws_sdk_s3::types::ObjectCannedAcl::PublicRead)
            .send()
            .await
            .map_err(|e| {
                tracing::error!(error = ?e, key = %key, "S3 upload failed");
                AppError::Storage(format!("Failed to upload file to S3: {}", e))
            })?;

        tracing::info!(key = %key, size = upload.data.len(), "media uploaded");
        Ok(MediaDescriptor {
            url: self.public_url(&key),
            public_id: key,
            kind: upload.kind(),
            filename: upload.filename.clone(),
        })
    }

    async fn destroy(&self, public_id: &str, resource: ResourceType) -> Result<(), AppError> {
        self.client
            .delete_object()
            .bucket(&self.bucket_name)
            .key(public_id)
            .send()
            .await
            .map_err(|e| {
                AppError::Storage(format!(
                    "Failed to delete {} {} from S3: {}",
                    resource.as_str(),
                    public_id,
                    e
                ))
            })?;

        Ok(())
    }
}

/// Object key (and public id) for an upload:
/// `{folder}/{image|video}/{millis}-{stem}.{ext}`.
pub fn object_key(folder: &str, resource: ResourceType, filename: &str, millis: i64) -> String {
    let path = std::path::Path::new(filename);
    let stem = path
        .file_stem()
        .and_then(std::ffi::OsStr::to_str)
        .map(sanitize_stem)
        .filter(|s| !s.is_empty())
        .unwrap_or_else(|| "upload".to_string());

    let mut key = format!("{}/{}/{}-{}", folder, resource.as_str(), millis, stem);
    if let Some(ext) = path.extension().and_then(std::ffi::OsStr::to_str) {
        key.push('.');
        key.push_str(&ext.to_lowercase());
    }
    key
}

fn sanitize_stem(stem: &str) -> String {
    stem.to_lowercase()
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() { c } else { '-' })
        .collect::<String>()
}
