//! HTTP implementation of the platform API ports.

use std::time::Duration;

use anyhow::{Context, Result, bail};
use edgeship_common::{ApiConfig, Backend, Domain, Package, PackageMetadata, Service, Version};
use reqwest::{Client, Method, RequestBuilder, Response, StatusCode, multipart};
use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::debug;

use crate::application::ports::{BackendApi, DomainApi, PackageApi, ServiceApi, VersionApi};
use crate::domain::setup::BackendSpec;

/// Header carrying the API token.
pub const AUTH_HEADER: &str = "Edgeship-Key";

const TIMEOUT: Duration = Duration::from_secs(60);
const UPLOAD_TIMEOUT: Duration = Duration::from_secs(300);

/// Platform API client over HTTPS.
pub struct HttpPlatformApi {
    client: Client,
    endpoint: String,
    token: String,
}

impl HttpPlatformApi {
    /// Build a client for `config.endpoint` authenticated with `token`.
    ///
    /// # Errors
    ///
    /// Returns an error if the TLS backend cannot be initialised.
    pub fn new(config: &ApiConfig, token: &str) -> Result<Self> {
        let client = Client::builder()
            .timeout(TIMEOUT)
            .user_agent(concat!("edgeship/", env!("CARGO_PKG_VERSION")))
            .build()
            .context("building HTTP client")?;
        Ok(Self {
            client,
            endpoint: config.endpoint.trim_end_matches('/').to_string(),
            token: token.to_string(),
        })
    }

    fn request(&self, method: Method, path: &str) -> RequestBuilder {
        let url = format!("{}{path}", self.endpoint);
        debug!(%method, %url, "api request");
        self.client
            .request(method, url)
            .header(AUTH_HEADER, &self.token)
    }

    async fn send(&self, method: Method, path: &str) -> Result<Response> {
        let response = self
            .request(method.clone(), path)
            .send()
            .await
            .with_context(|| format!("{method} {path}"))?;
        check(method, path, response).await
    }

    async fn send_json<B: Serialize>(&self, method: Method, path: &str, body: &B) -> Result<Response> {
        let response = self
            .request(method.clone(), path)
            .json(body)
            .send()
            .await
            .with_context(|| format!("{method} {path}"))?;
        check(method, path, response).await
    }

    async fn get<T: DeserializeOwned>(&self, path: &str) -> Result<T> {
        decode(self.send(Method::GET, path).await?, path).await
    }
}

/// Turn a non-2xx answer into an error carrying status and body.
async fn check(method: Method, path: &str, response: Response) -> Result<Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let body = response.text().await.unwrap_or_default();
    bail!("{method} {path}: {status}: {}", body.trim())
}

async fn decode<T: DeserializeOwned>(response: Response, path: &str) -> Result<T> {
    response
        .json()
        .await
        .with_context(|| format!("decoding response of {path}"))
}

fn version_path(service_id: &str, version: u32) -> String {
    format!("/service/{service_id}/version/{version}")
}

#[derive(Serialize)]
struct NameBody<'a> {
    name: &'a str,
}

#[derive(Serialize)]
struct CreateServiceBody<'a> {
    name: &'a str,
    #[serde(rename = "type")]
    kind: &'a str,
}

#[derive(Serialize)]
struct CommentBody<'a> {
    comment: &'a str,
}

impl ServiceApi for HttpPlatformApi {
    async fn create_service(&self, name: &str) -> Result<Service> {
        let body = CreateServiceBody { name, kind: "wasm" };
        let response = self.send_json(Method::POST, "/service", &body).await?;
        decode(response, "/service").await
    }

    async fn delete_service(&self, service_id: &str) -> Result<()> {
        self.send(Method::DELETE, &format!("/service/{service_id}"))
            .await
            .map(drop)
    }
}

impl VersionApi for HttpPlatformApi {
    async fn list_versions(&self, service_id: &str) -> Result<Vec<Version>> {
        self.get(&format!("/service/{service_id}/version")).await
    }

    async fn clone_version(&self, service_id: &str, version: u32) -> Result<Version> {
        let path = format!("{}/clone", version_path(service_id, version));
        decode(self.send(Method::PUT, &path).await?, &path).await
    }

    async fn update_version_comment(
        &self,
        service_id: &str,
        version: u32,
        comment: &str,
    ) -> Result<()> {
        let path = version_path(service_id, version);
        self.send_json(Method::PUT, &path, &CommentBody { comment })
            .await
            .map(drop)
    }

    async fn activate_version(&self, service_id: &str, version: u32) -> Result<()> {
        let path = format!("{}/activate", version_path(service_id, version));
        self.send(Method::PUT, &path).await.map(drop)
    }
}

impl DomainApi for HttpPlatformApi {
    async fn list_domains(&self, service_id: &str, version: u32) -> Result<Vec<Domain>> {
        self.get(&format!("{}/domain", version_path(service_id, version)))
            .await
    }

    async fn create_domain(&self, service_id: &str, version: u32, name: &str) -> Result<Domain> {
        let path = format!("{}/domain", version_path(service_id, version));
        decode(self.send_json(Method::POST, &path, &NameBody { name }).await?, &path).await
    }

    async fn delete_domain(&self, service_id: &str, version: u32, name: &str) -> Result<()> {
        let path = format!("{}/domain/{name}", version_path(service_id, version));
        self.send(Method::DELETE, &path).await.map(drop)
    }
}

impl BackendApi for HttpPlatformApi {
    async fn list_backends(&self, service_id: &str, version: u32) -> Result<Vec<Backend>> {
        self.get(&format!("{}/backend", version_path(service_id, version)))
            .await
    }

    async fn create_backend(
        &self,
        service_id: &str,
        version: u32,
        spec: &BackendSpec,
    ) -> Result<Backend> {
        let path = format!("{}/backend", version_path(service_id, version));
        let body = Backend {
            name: spec.name.clone(),
            address: spec.address.clone(),
            port: spec.port,
        };
        decode(self.send_json(Method::POST, &path, &body).await?, &path).await
    }

    async fn delete_backend(&self, service_id: &str, version: u32, name: &str) -> Result<()> {
        let path = format!("{}/backend/{name}", version_path(service_id, version));
        self.send(Method::DELETE, &path).await.map(drop)
    }
}

impl PackageApi for HttpPlatformApi {
    async fn get_package_metadata(
        &self,
        service_id: &str,
        version: u32,
    ) -> Result<Option<PackageMetadata>> {
        let path = format!("{}/package", version_path(service_id, version));
        let response = self
            .request(Method::GET, &path)
            .send()
            .await
            .with_context(|| format!("GET {path}"))?;
        if response.status() == StatusCode::NOT_FOUND {
            return Ok(None);
        }
        let response = check(Method::GET, &path, response).await?;
        let package: Package = decode(response, &path).await?;
        Ok(Some(package.metadata))
    }

    async fn upload_package(&self, service_id: &str, version: u32, package: &[u8]) -> Result<()> {
        let path = format!("{}/package", version_path(service_id, version));
        let part = multipart::Part::bytes(package.to_vec())
            .file_name("package.tar.gz")
            .mime_str("application/gzip")
            .context("building upload body")?;
        let form = multipart::Form::new().part("package", part);
        let response = self
            .request(Method::PUT, &path)
            .timeout(UPLOAD_TIMEOUT)
            .multipart(form)
            .send()
            .await
            .with_context(|| format!("PUT {path}"))?;
        check(Method::PUT, &path, response).await.map(drop)
    }
}
