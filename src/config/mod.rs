//! Configuration loading

use crate::booking::model::{CapacityInput, City, Client, PrototypeMember, Tour, TourDay, TourType};
use crate::core::error::{ConfigError, DeskResult};
use serde::{Deserialize, Serialize};
use std::net::{SocketAddr, ToSocketAddrs};
use std::path::Path;
use std::time::Duration;
use uuid::Uuid;

/// Address the booking server listens on
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

impl ServerConfig {
    /// `host:port` as written, for `TcpListener::bind`
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// Resolve the configured host; hostnames such as `localhost` are looked up
    pub fn socket_addr(&self) -> DeskResult<SocketAddr> {
        let addr = self.bind_address();
        let mut resolved = (self.host.as_str(), self.port)
            .to_socket_addrs()
            .map_err(|e| ConfigError::ParseError {
                file: None,
                message: format!("invalid server address '{}': {}", addr, e),
            })?;
        resolved.next().ok_or_else(|| {
            ConfigError::ParseError {
                file: None,
                message: format!("server address '{}' resolved to nothing", addr),
            }
            .into()
        })
    }
}

/// Remote back-office API used by [`HttpBookingApi`](crate::client::HttpBookingApi)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiConfig {
    #[serde(default = "default_base_url")]
    pub base_url: String,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

impl ApiConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// `tracing_subscriber::EnvFilter` directives; `RUST_LOG` wins when set
    #[serde(default = "default_filter")]
    pub filter: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            filter: default_filter(),
        }
    }
}

/// Reference data loaded into the in-memory store at startup
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SeedConfig {
    #[serde(default)]
    pub tours: Vec<Tour>,
    #[serde(default)]
    pub clients: Vec<Client>,
    #[serde(default)]
    pub cities: Vec<City>,
}

/// Complete configuration of a booking desk deployment
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DeskConfig {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub api: ApiConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
    #[serde(default)]
    pub seed: SeedConfig,
}

impl DeskConfig {
    /// Load configuration from a YAML file
    pub fn from_yaml_file(path: impl AsRef<Path>) -> DeskResult<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::IoError {
            message: format!("{}: {}", path.display(), e),
        })?;
        Self::parse(&content, Some(path.display().to_string()))
    }

    /// Load configuration from a YAML string
    pub fn from_yaml_str(yaml: &str) -> DeskResult<Self> {
        Self::parse(yaml, None)
    }

    fn parse(yaml: &str, file: Option<String>) -> DeskResult<Self> {
        serde_yaml::from_str(yaml).map_err(|e| {
            ConfigError::ParseError {
                file,
                message: e.to_string(),
            }
            .into()
        })
    }

    /// A small seeded configuration for tests and demos
    pub fn default_config() -> Self {
        let mumbai = City {
            id: Uuid::new_v4(),
            name: "Mumbai".to_string(),
            state: Some("Maharashtra".to_string()),
        };
        let goa = City {
            id: Uuid::new_v4(),
            name: "Panaji".to_string(),
            state: Some("Goa".to_string()),
        };

        let tours = vec![
            Tour {
                id: Uuid::new_v4(),
                name: "Konkan Coast Group Tour".to_string(),
                tour_type: TourType::Group,
                capacity: CapacityInput::new(4, 1, 0),
                itinerary: vec![
                    TourDay {
                        description: "Arrive in Mumbai".to_string(),
                        location_id: Some(mumbai.id),
                    },
                    TourDay {
                        description: "Coastal drive".to_string(),
                        location_id: None,
                    },
                    TourDay {
                        description: "Beaches of Goa".to_string(),
                        location_id: Some(goa.id),
                    },
                ],
            },
            Tour {
                id: Uuid::new_v4(),
                name: "Goa Weekend".to_string(),
                tour_type: TourType::Individual,
                capacity: CapacityInput::new(2, 0, 0),
                itinerary: vec![
                    TourDay {
                        description: "Check in".to_string(),
                        location_id: Some(goa.id),
                    },
                    TourDay {
                        description: "Check out".to_string(),
                        location_id: Some(goa.id),
                    },
                ],
            },
        ];

        let family = ["Anita Rao", "Kiran Rao", "Leela Rao"]
            .iter()
            .map(|name| PrototypeMember {
                name: Some(name.to_string()),
                relation: Some("family".to_string()),
                ..Default::default()
            })
            .collect();
        let clients = vec![Client {
            id: Uuid::new_v4(),
            name: "Suresh Rao".to_string(),
            mobile: "9820012345".to_string(),
            email: Some("suresh.rao@example.com".to_string()),
            family_friends: family,
        }];

        Self {
            seed: SeedConfig {
                tours,
                clients,
                cities: vec![mumbai, goa],
            },
            ..Default::default()
        }
    }
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    3000
}

fn default_base_url() -> String {
    "http://127.0.0.1:3000".to_string()
}

fn default_timeout_secs() -> u64 {
    10
}

fn default_filter() -> String {
    "info".to_string()
}
