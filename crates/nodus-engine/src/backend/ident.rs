use core::fmt;

use crate::error::{Result, ViewerError};

use super::render::RenderBackend;
use super::{NullBackend, SoftwareBackend};

/// Raw backend identifier, as supplied by embedders.
///
/// Identifiers are small integers so they can cross process-facing surfaces
/// unchanged; anything outside the known set is rejected by
/// [`Backend::resolve`] rather than at construction.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub struct BackendId(pub i32);

impl BackendId {
    /// Resolve to the first available backend at configure time.
    pub const AUTO: Self = Self(0);
    /// CPU rasterizing backend.
    pub const SOFTWARE: Self = Self(1);
    /// Lifecycle-only backend with no pixel output.
    pub const NULL: Self = Self(2);

    /// Parses a backend name or raw integer.
    ///
    /// Unrecognized input maps to a guaranteed-invalid id instead of a second
    /// error channel, so the failure surfaces through the normal
    /// `InvalidBackend` path at configure time.
    pub fn parse(s: &str) -> Self {
        match s.trim().to_ascii_lowercase().as_str() {
            "auto" => Self::AUTO,
            "software" => Self::SOFTWARE,
            "null" => Self::NULL,
            other => other.parse::<i32>().map(Self).unwrap_or(Self(i32::MIN)),
        }
    }

    /// Backend selection for test harnesses: reads the `BACKEND` environment
    /// variable. Absent means the caller should apply the AUTO policy.
    pub fn from_env() -> Option<Self> {
        std::env::var("BACKEND").ok().map(|s| Self::parse(&s))
    }
}

impl fmt::Display for BackendId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match *self {
            Self::AUTO => write!(f, "auto"),
            Self::SOFTWARE => write!(f, "software"),
            Self::NULL => write!(f, "null"),
            Self(raw) => write!(f, "id {raw:#x}"),
        }
    }
}

/// A validated, available rendering backend.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum Backend {
    Software,
    Null,
}

impl Backend {
    /// AUTO probe order. First available entry wins.
    const PROBE_ORDER: [Self; 2] = [Self::Software, Self::Null];

    /// Maps a requested identifier to an available backend.
    ///
    /// `AUTO` picks the first backend the host environment supports; an
    /// unknown or unavailable explicit id fails with `InvalidBackend`.
    pub fn resolve(id: BackendId) -> Result<Self> {
        let resolved = match id {
            BackendId::AUTO => Self::PROBE_ORDER
                .into_iter()
                .find(|b| b.is_available()),
            BackendId::SOFTWARE => Some(Self::Software).filter(|b| b.is_available()),
            BackendId::NULL => Some(Self::Null).filter(|b| b.is_available()),
            _ => None,
        };

        match resolved {
            Some(backend) => {
                log::debug!("backend {id} resolved to {}", backend.name());
                Ok(backend)
            }
            None => {
                log::warn!("backend {id} is unknown or unavailable");
                Err(ViewerError::InvalidBackend { id })
            }
        }
    }

    /// Whether the host environment supports this backend.
    ///
    /// Both built-in backends are pure CPU and always available; GPU-backed
    /// implementations gate on adapter probing here.
    pub fn is_available(self) -> bool {
        match self {
            Self::Software | Self::Null => true,
        }
    }

    /// Whether this backend can present to a window surface.
    ///
    /// Neither built-in backend owns a swapchain, so onscreen configuration
    /// is rejected for both.
    pub const fn can_present(self) -> bool {
        match self {
            Self::Software | Self::Null => false,
        }
    }

    pub const fn id(self) -> BackendId {
        match self {
            Self::Software => BackendId::SOFTWARE,
            Self::Null => BackendId::NULL,
        }
    }

    pub const fn name(self) -> &'static str {
        match self {
            Self::Software => "software",
            Self::Null => "null",
        }
    }

    /// Instantiates the backend's render implementation.
    pub(crate) fn instantiate(self) -> Box<dyn RenderBackend> {
        match self {
            Self::Software => Box::new(SoftwareBackend::new()),
            Self::Null => Box::new(NullBackend),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn auto_resolves_to_first_available() {
        assert_eq!(Backend::resolve(BackendId::AUTO).unwrap(), Backend::Software);
    }

    #[test]
    fn explicit_ids_resolve() {
        assert_eq!(Backend::resolve(BackendId::SOFTWARE).unwrap(), Backend::Software);
        assert_eq!(Backend::resolve(BackendId::NULL).unwrap(), Backend::Null);
    }

    #[test]
    fn out_of_range_id_is_invalid() {
        let err = Backend::resolve(BackendId(0x1234)).unwrap_err();
        assert!(matches!(err, ViewerError::InvalidBackend { id } if id == BackendId(0x1234)));
        assert!(err.code() < 0);
    }

    #[test]
    fn parse_accepts_names_and_integers() {
        assert_eq!(BackendId::parse("software"), BackendId::SOFTWARE);
        assert_eq!(BackendId::parse(" NULL "), BackendId::NULL);
        assert_eq!(BackendId::parse("2"), BackendId::NULL);
        assert_eq!(BackendId::parse("auto"), BackendId::AUTO);
    }

    #[test]
    fn parse_maps_garbage_to_an_invalid_id() {
        let id = BackendId::parse("opengl9000");
        assert!(Backend::resolve(id).is_err());
    }
}
