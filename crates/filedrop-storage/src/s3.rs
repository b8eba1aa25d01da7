use crate::traits::{ObjectVisibility, Storage, StorageError, StorageResult};
use crate::StorageBackend;
use async_trait::async_trait;
use aws_config::{BehaviorVersion, Region};
use aws_sdk_s3::error::{DisplayErrorContext, ProvideErrorMetadata, SdkError};
use aws_sdk_s3::operation::put_object::PutObjectError;
use aws_sdk_s3::primitives::ByteStream;
use aws_sdk_s3::types::ObjectCannedAcl;
use aws_sdk_s3::Client;
use bytes::Bytes;

/// S3 storage implementation
#[derive(Clone)]
pub struct S3Storage {
    client: Client,
    bucket: String,
    region: String,
    endpoint_url: Option<String>, // Custom endpoint for S3-compatible providers
}

impl S3Storage {
    /// Create a new S3Storage instance
    ///
    /// # Arguments
    /// * `bucket` - S3 bucket name
    /// * `region` - AWS region (or region identifier for S3-compatible providers)
    /// * `endpoint_url` - Optional custom endpoint URL for S3-compatible providers
    ///   (e.g., "http://localhost:9000" for MinIO, "https://nyc3.digitaloceanspaces.com" for DigitalOcean Spaces)
    ///
    /// Credentials come from the SDK's standard environment/profile chain.
    pub async fn new(
        bucket: String,
        region: String,
        endpoint_url: Option<String>,
    ) -> StorageResult<Self> {
        let sdk_config = aws_config::defaults(BehaviorVersion::latest())
            .region(Region::new(region.clone()))
            .load()
            .await;

        let mut builder = aws_sdk_s3::config::Builder::from(&sdk_config);
        if let Some(ref endpoint) = endpoint_url {
            // S3-compatible providers usually want path-style addressing
            builder = builder.endpoint_url(endpoint.clone()).force_path_style(true);
        }

        let client = Client::from_conf(builder.build());

        Ok(S3Storage {
            client,
            bucket,
            region,
            endpoint_url,
        })
    }

    /// Generate public URL for S3 object
    ///
    /// For AWS S3, uses the standard format: https://{bucket}.s3.{region}.amazonaws.com/{key}
    /// For S3-compatible providers, uses path-style against the endpoint URL
    fn generate_url(&self, key: &str) -> String {
        if let Some(ref endpoint) = self.endpoint_url {
            let base_url = endpoint.trim_end_matches('/');
            format!("{}/{}/{}", base_url, self.bucket, key)
        } else {
            format!(
                "https://{}.s3.{}.amazonaws.com/{}",
                self.bucket, self.region, key
            )
        }
    }

    fn map_put_error(err: SdkError<PutObjectError>) -> StorageError {
        let code = match &err {
            SdkError::TimeoutError(_) => "timeout".to_string(),
            SdkError::DispatchFailure(_) => "network".to_string(),
            other => other.code().unwrap_or("unknown").to_string(),
        };
        StorageError::UploadFailed {
            code,
            detail: DisplayErrorContext(err).to_string(),
        }
    }
}

#[async_trait]
impl Storage for S3Storage {
    async fn put(
        &self,
        key: &str,
        content_type: &str,
        data: Bytes,
        visibility: ObjectVisibility,
    ) -> StorageResult<String> {
        if key.contains("..") || key.starts_with('/') {
            return Err(StorageError::InvalidKey(key.to_string()));
        }

        let size = data.len() as u64;
        let acl = match visibility {
            ObjectVisibility::PublicRead => ObjectCannedAcl::PublicRead,
            ObjectVisibility::Private => ObjectCannedAcl::Private,
        };

        let start = std::time::Instant::now();

        self.client
            .put_object()
            .bucket(&self.bucket)
            .key(key)
            .body(ByteStream::from(data))
            .content_type(content_type)
            .acl(acl)
            .send()
            .await
            .map_err(|e| {
                let mapped = Self::map_put_error(e);
                tracing::error!(
                    error = %mapped,
                    bucket = %self.bucket,
                    key = %key,
                    size_bytes = size,
                    duration_ms = start.elapsed().as_secs_f64() * 1000.0,
                    "S3 upload failed"
                );
                mapped
            })?;

        let url = self.generate_url(key);

        tracing::info!(
            bucket = %self.bucket,
            key = %key,
            size_bytes = size,
            duration_ms = start.elapsed().as_secs_f64() * 1000.0,
            "S3 upload successful"
        );

        Ok(url)
    }

    async fn exists(&self, key: &str) -> StorageResult<bool> {
        match self
            .client
            .head_object()
            .bucket(&self.bucket)
            .key(key)
            .send()
            .await
        {
            Ok(_) => Ok(true),
            Err(err) => {
                let service_err = err.into_service_error();
                if service_err.is_not_found() {
                    Ok(false)
                } else {
                    Err(StorageError::BackendError(service_err.to_string()))
                }
            }
        }
    }

    fn backend_type(&self) -> StorageBackend {
        StorageBackend::S3
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn storage(endpoint: Option<&str>) -> S3Storage {
        // Client is never exercised by these tests; only URL generation is.
        let config = aws_sdk_s3::Config::builder()
            .behavior_version(BehaviorVersion::latest())
            .region(Region::new("us-east-1"))
            .build();
        S3Storage {
            client: Client::from_conf(config),
            bucket: "uploads".to_string(),
            region: "us-east-1".to_string(),
            endpoint_url: endpoint.map(String::from),
        }
    }

    #[test]
    fn test_generate_url_aws_virtual_hosted_style() {
        let s3 = storage(None);
        assert_eq!(
            s3.generate_url("abc_photo.png"),
            "https://uploads.s3.us-east-1.amazonaws.com/abc_photo.png"
        );
    }

    #[test]
    fn test_generate_url_custom_endpoint_path_style() {
        let s3 = storage(Some("http://localhost:9000/"));
        assert_eq!(
            s3.generate_url("abc_photo.png"),
            "http://localhost:9000/uploads/abc_photo.png"
        );
    }

    #[tokio::test]
    async fn test_put_rejects_traversal_keys() {
        let s3 = storage(None);
        let err = s3
            .put(
                "../escape.txt",
                "text/plain",
                Bytes::from_static(b"x"),
                ObjectVisibility::PublicRead,
            )
            .await
            .unwrap_err();
        assert!(matches!(err, StorageError::InvalidKey(_)));
    }
}
