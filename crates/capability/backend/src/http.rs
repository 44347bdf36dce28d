//! 基于 reqwest 的后端客户端。

use crate::error::BackendError;
use crate::traits::{AnomalyImage, FleetBackend, UnitUpdate};
use crate::wire::{LIST_KEYS, decode_items, error_message, extract_list, extract_object, sample_uuids};
use async_trait::async_trait;
use domain::{
    AnomalyLog, AppAssignment, Camera, ComputeUnit, MemorySet, PingMethod, PingReport,
    SystemStats, unit_base_url,
};
use reqwest::{Client, Method, RequestBuilder, Response, StatusCode};
use serde::Deserialize;
use serde_json::{Value, json};
use std::sync::RwLock;
use std::time::Duration;
use tracing::{debug, info, warn};

/// 客户端构造参数。
#[derive(Debug, Clone)]
pub struct HttpBackendOptions {
    pub base_url: String,
    pub request_timeout: Duration,
    pub ping_timeout: Duration,
    pub unit_port: u16,
    pub token: Option<String>,
    /// 用户名与口令；配置后 token 被拒（401）时自动重新登录并重试一次。
    pub credentials: Option<(String, String)>,
}

/// 外部后端 HTTP 客户端。
pub struct HttpFleetBackend {
    http: Client,
    ping_http: Client,
    base_url: String,
    unit_port: u16,
    token: RwLock<Option<String>>,
    credentials: Option<(String, String)>,
}

#[derive(Debug, Deserialize)]
struct LoginResponse {
    access_token: String,
    #[serde(default)]
    user: Value,
}

#[derive(Debug, Deserialize)]
struct PingBody {
    msg: Option<String>,
    status: Option<String>,
}

impl HttpFleetBackend {
    pub fn new(options: HttpBackendOptions) -> Result<Self, BackendError> {
        let http = Client::builder()
            .timeout(options.request_timeout)
            .build()
            .map_err(|err| BackendError::Transport(err.to_string()))?;
        let ping_http = Client::builder()
            .timeout(options.ping_timeout)
            .build()
            .map_err(|err| BackendError::Transport(err.to_string()))?;
        Ok(Self {
            http,
            ping_http,
            base_url: options.base_url.trim_end_matches('/').to_string(),
            unit_port: options.unit_port,
            token: RwLock::new(options.token),
            credentials: options.credentials,
        })
    }

    /// 登录后端并保存返回的 Bearer token，返回后端的用户对象（透传）。
    pub async fn login(&self, username: &str, password: &str) -> Result<Value, BackendError> {
        if username.trim().is_empty() || password.is_empty() {
            return Err(BackendError::InvalidInput(
                "username and password are required".to_string(),
            ));
        }
        let body = json!({ "username": username, "password": password });
        let response = self
            .http
            .post(format!("{}/login", self.base_url))
            .json(&body)
            .send()
            .await?;
        let body = check_status(response).await?.bytes().await?;
        let response: LoginResponse = serde_json::from_slice(&body)?;
        if let Ok(mut token) = self.token.write() {
            *token = Some(response.access_token);
        }
        info!(username, "backend login succeeded");
        Ok(response.user)
    }

    /// 使用构造时配置的账号登录。
    pub async fn login_with_credentials(&self) -> Result<Value, BackendError> {
        match &self.credentials {
            Some((username, password)) => self.login(username, password).await,
            None => Err(BackendError::InvalidInput(
                "backend credentials are not configured".to_string(),
            )),
        }
    }

    fn request(&self, method: Method, path: &str) -> RequestBuilder {
        self.http
            .request(method, format!("{}{}", self.base_url, path))
    }

    fn authorized(&self, builder: RequestBuilder) -> RequestBuilder {
        let token = self.token.read().ok().and_then(|token| token.clone());
        match token {
            Some(token) => builder.bearer_auth(token),
            None => builder,
        }
    }

    /// 发送请求；token 被拒且配置了账号时重新登录并重试一次。
    async fn send(&self, builder: RequestBuilder) -> Result<Response, BackendError> {
        let retry = match self.credentials {
            Some(_) => builder.try_clone(),
            None => None,
        };
        let response = self.authorized(builder).send().await?;
        if response.status() == StatusCode::UNAUTHORIZED
            && let Some(retry) = retry
        {
            warn!(target: "fleet.backend", "backend_token_rejected_relogin");
            self.login_with_credentials().await?;
            let response = self.authorized(retry).send().await?;
            return check_status(response).await;
        }
        check_status(response).await
    }

    /// 发送请求并解析 JSON，空响应体视为 null。
    async fn send_json(&self, builder: RequestBuilder) -> Result<Value, BackendError> {
        let response = self.send(builder).await?;
        let body = response.bytes().await?;
        if body.iter().all(u8::is_ascii_whitespace) {
            return Ok(Value::Null);
        }
        Ok(serde_json::from_slice(&body)?)
    }

    async fn get_list(
        &self,
        path: &str,
        query: &[(&str, &str)],
    ) -> Result<Vec<Value>, BackendError> {
        let value = self
            .send_json(self.request(Method::GET, path).query(query))
            .await?;
        extract_list(value, LIST_KEYS)
    }
}

/// 非 2xx 转为 `BackendError::Status`，消息取自错误体。
async fn check_status(response: Response) -> Result<Response, BackendError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let body = response.bytes().await.unwrap_or_default();
    let message = error_message(&body).unwrap_or_else(|| {
        status
            .canonical_reason()
            .unwrap_or("request failed")
            .to_string()
    });
    debug!(status = status.as_u16(), %message, "backend returned error status");
    Err(BackendError::Status {
        status: status.as_u16(),
        message,
    })
}

fn require(field: &str, value: &str) -> Result<(), BackendError> {
    if value.trim().is_empty() {
        return Err(BackendError::InvalidInput(format!("{field} is required")));
    }
    Ok(())
}

#[async_trait]
impl FleetBackend for HttpFleetBackend {
    async fn list_units(&self) -> Result<Vec<ComputeUnit>, BackendError> {
        let items = self.get_list("/api/compute_units", &[]).await?;
        Ok(decode_items(items, "compute_unit"))
    }

    async fn add_unit(
        &self,
        ip_address: &str,
        name: Option<&str>,
    ) -> Result<ComputeUnit, BackendError> {
        require("ip_address", ip_address)?;
        let mut body = json!({ "ip_address": ip_address.trim() });
        if let Some(name) = name.map(str::trim).filter(|name| !name.is_empty()) {
            body["name"] = Value::String(name.to_string());
        }
        let value = self
            .send_json(self.request(Method::POST, "/api/compute_units").json(&body))
            .await?;
        Ok(serde_json::from_value(extract_object(value, "compute_unit"))?)
    }

    async fn update_unit(
        &self,
        id: &str,
        update: &UnitUpdate,
    ) -> Result<ComputeUnit, BackendError> {
        require("id", id)?;
        let path = format!("/api/compute_units/{id}");
        let value = self
            .send_json(self.request(Method::PUT, &path).json(update))
            .await?;
        Ok(serde_json::from_value(extract_object(value, "compute_unit"))?)
    }

    async fn delete_unit(&self, id: &str) -> Result<(), BackendError> {
        require("id", id)?;
        let path = format!("/api/compute_units/{id}");
        self.send(self.request(Method::DELETE, &path)).await?;
        Ok(())
    }

    async fn list_cameras(&self, unit_ip: &str) -> Result<Vec<Camera>, BackendError> {
        require("compute_unit_ip", unit_ip)?;
        let items = self
            .get_list("/get_cameras", &[("compute_unit_ip", unit_ip)])
            .await?;
        let mut cameras: Vec<Camera> = decode_items(items, "camera");
        for camera in &mut cameras {
            if camera.compute_unit_ip.as_deref().is_none_or(str::is_empty) {
                camera.compute_unit_ip = Some(unit_ip.to_string());
            }
        }
        Ok(cameras)
    }

    async fn rename_streamer(&self, streamer_uuid: &str, name: &str) -> Result<(), BackendError> {
        require("streamer_uuid", streamer_uuid)?;
        require("name", name)?;
        let path = format!("/api/streamers/{streamer_uuid}/name");
        self.send(
            self.request(Method::PUT, &path)
                .json(&json!({ "name": name.trim() })),
        )
        .await?;
        Ok(())
    }

    async fn last_frame(&self, streamer_uuid: &str, unit_ip: &str) -> Result<Value, BackendError> {
        require("streamer_uuid", streamer_uuid)?;
        require("compute_unit_ip", unit_ip)?;
        let body = json!({ "streamer_uuid": streamer_uuid, "compute_unit_ip": unit_ip });
        self.send_json(
            self.request(Method::POST, "/api/streamers/last_frame")
                .json(&body),
        )
        .await
    }

    async fn supported_apps(&self, unit_ip: &str) -> Result<Value, BackendError> {
        require("compute_unit_ip", unit_ip)?;
        self.send_json(
            self.request(Method::GET, "/api/apps/supported")
                .query(&[("compute_unit_ip", unit_ip)]),
        )
        .await
    }

    async fn list_assignments(
        &self,
        unit_ip: &str,
        streamer_uuid: Option<&str>,
    ) -> Result<Vec<AppAssignment>, BackendError> {
        require("compute_unit_ip", unit_ip)?;
        let mut query = vec![("compute_unit_ip", unit_ip)];
        if let Some(streamer_uuid) = streamer_uuid {
            query.push(("streamer_uuid", streamer_uuid));
        }
        let items = self.get_list("/api/apps/assignments", &query).await?;
        let mut assignments: Vec<AppAssignment> = decode_items(items, "assignment");
        if let Some(streamer_uuid) = streamer_uuid {
            assignments.retain(|item| item.streamer_uuid == streamer_uuid);
        }
        Ok(assignments)
    }

    async fn update_assignment(
        &self,
        unit_ip: &str,
        assignment: &AppAssignment,
    ) -> Result<Value, BackendError> {
        require("compute_unit_ip", unit_ip)?;
        require("streamer_uuid", &assignment.streamer_uuid)?;
        self.send_json(
            self.request(Method::PUT, "/api/apps/assignments/update")
                .query(&[("compute_unit_ip", unit_ip)])
                .json(assignment),
        )
        .await
    }

    async fn delete_assignment(
        &self,
        unit_ip: &str,
        assignment_uuid: &str,
    ) -> Result<(), BackendError> {
        require("compute_unit_ip", unit_ip)?;
        require("assignment_uuid", assignment_uuid)?;
        self.send(
            self.request(Method::DELETE, "/api/apps/assignments/delete")
                .query(&[("compute_unit_ip", unit_ip)])
                .json(&json!({ "assignment_uuid": assignment_uuid })),
        )
        .await?;
        Ok(())
    }

    async fn anomaly_logs(&self, unit_ip: &str) -> Result<Vec<AnomalyLog>, BackendError> {
        require("compute_unit_ip", unit_ip)?;
        let items = self
            .get_list("/api/anomaly_logs/metadata", &[("compute_unit_ip", unit_ip)])
            .await?;
        Ok(decode_items(items, "anomaly_log"))
    }

    async fn anomaly_image(
        &self,
        unit_ip: &str,
        file_path: &str,
    ) -> Result<AnomalyImage, BackendError> {
        require("compute_unit_ip", unit_ip)?;
        require("file_path", file_path)?;
        let response = self
            .send(
                self.request(Method::GET, "/api/anomaly_logs/image")
                    .query(&[("compute_unit_ip", unit_ip), ("file_path", file_path)]),
            )
            .await?;
        let content_type = response
            .headers()
            .get(reqwest::header::CONTENT_TYPE)
            .and_then(|value| value.to_str().ok())
            .unwrap_or("image/jpeg")
            .to_string();
        let bytes = response.bytes().await?.to_vec();
        Ok(AnomalyImage {
            bytes,
            content_type,
        })
    }

    async fn star_anomaly(
        &self,
        unit_ip: &str,
        anomaly_uuid: &str,
        starred: bool,
    ) -> Result<(), BackendError> {
        require("compute_unit_ip", unit_ip)?;
        require("anomaly_uuid", anomaly_uuid)?;
        let body = json!({
            "compute_unit_ip": unit_ip,
            "anomaly_uuid": anomaly_uuid,
            "is_starred": starred,
        });
        self.send(self.request(Method::POST, "/api/anomaly_logs/star").json(&body))
            .await?;
        Ok(())
    }

    async fn delete_anomaly(
        &self,
        unit_ip: &str,
        anomaly_uuid: &str,
    ) -> Result<(), BackendError> {
        require("compute_unit_ip", unit_ip)?;
        require("anomaly_uuid", anomaly_uuid)?;
        let body = json!({ "compute_unit_ip": unit_ip, "anomaly_uuid": anomaly_uuid });
        self.send(
            self.request(Method::DELETE, "/api/anomaly_logs/delete")
                .json(&body),
        )
        .await?;
        Ok(())
    }

    async fn memory_sets(&self, unit_ip: &str) -> Result<Vec<MemorySet>, BackendError> {
        require("compute_unit_ip", unit_ip)?;
        let items = self
            .get_list("/api/memory_set/rows", &[("compute_unit_ip", unit_ip)])
            .await?;
        Ok(decode_items(items, "memory_set"))
    }

    async fn memory_set_samples(
        &self,
        unit_ip: &str,
        set_uuid: &str,
    ) -> Result<Vec<String>, BackendError> {
        require("compute_unit_ip", unit_ip)?;
        require("set_uuid", set_uuid)?;
        let value = self
            .send_json(
                self.request(Method::GET, "/api/memory_set/samples")
                    .query(&[("compute_unit_ip", unit_ip), ("set_uuid", set_uuid)]),
            )
            .await?;
        Ok(sample_uuids(value))
    }

    async fn memory_set_thumbnails(
        &self,
        unit_ip: &str,
        sample_uuids: &[String],
    ) -> Result<Value, BackendError> {
        require("compute_unit_ip", unit_ip)?;
        if sample_uuids.is_empty() {
            return Err(BackendError::InvalidInput(
                "sample_uuids must not be empty".to_string(),
            ));
        }
        let body = json!({ "compute_unit_ip": unit_ip, "sample_uuids": sample_uuids });
        self.send_json(
            self.request(Method::POST, "/api/memory_set/thumbnails")
                .json(&body),
        )
        .await
    }

    async fn delete_memory_set(&self, unit_ip: &str, set_uuid: &str) -> Result<(), BackendError> {
        require("compute_unit_ip", unit_ip)?;
        require("set_uuid", set_uuid)?;
        let body = json!({ "compute_unit_ip": unit_ip, "set_uuid": set_uuid });
        self.send(
            self.request(Method::DELETE, "/api/memory_set/delete")
                .json(&body),
        )
        .await?;
        Ok(())
    }

    async fn system_stats(&self) -> Result<SystemStats, BackendError> {
        let value = self
            .send_json(self.request(Method::GET, "/api/system/stats"))
            .await?;
        Ok(serde_json::from_value(value)?)
    }

    async fn ai_service_health(&self) -> Result<Value, BackendError> {
        self.send_json(self.request(Method::GET, "/api/ai_service/health"))
            .await
    }

    async fn streamer_configs(&self, streamer_uuid: &str) -> Result<Value, BackendError> {
        require("streamer_uuid", streamer_uuid)?;
        self.send_json(
            self.request(Method::GET, "/api/streamers/configs")
                .query(&[("streamer_uuid", streamer_uuid)]),
        )
        .await
    }

    async fn ping_unit(&self, ip: &str) -> PingReport {
        if ip.trim().is_empty() {
            return PingReport::unreachable(PingMethod::ConnectionFailed, "missing ip address");
        }
        let url = format!("{}/ping", unit_base_url(ip, self.unit_port));
        let response = match self.ping_http.get(&url).send().await {
            Ok(response) => response,
            Err(err) if err.is_timeout() => {
                warn!(ip, "unit ping timed out");
                return PingReport::unreachable(
                    PingMethod::ConnectionTimeout,
                    "Device not found - connection timeout",
                );
            }
            Err(err) if err.is_connect() => {
                warn!(ip, "unit ping connection refused");
                return PingReport::unreachable(
                    PingMethod::ConnectionRefused,
                    "Device not found - connection refused",
                );
            }
            Err(err) => {
                warn!(ip, error = %err, "unit ping failed");
                return PingReport::unreachable(
                    PingMethod::ConnectionFailed,
                    "Device not found - unable to connect",
                );
            }
        };

        let status = response.status();
        if !status.is_success() {
            return PingReport::unreachable(
                PingMethod::DirectAiPing,
                format!("Device not found (HTTP {})", status.as_u16()),
            );
        }
        match response.json::<PingBody>().await {
            Ok(body) => {
                let reachable = body.msg.as_deref() == Some("pong");
                let text = body
                    .msg
                    .or(body.status)
                    .unwrap_or_else(|| "Unknown".to_string());
                debug!(ip, response = %text, reachable, "unit ping answered");
                PingReport {
                    reachable,
                    response: text,
                    method: PingMethod::DirectAiPing,
                }
            }
            Err(_) => PingReport::unreachable(
                PingMethod::ConnectionFailed,
                "Device not found - unable to connect",
            ),
        }
    }
}
