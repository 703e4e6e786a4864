//! Device classification.
//!
//! The layout builder and navigation coordinator only see a
//! [`DeviceClass`]. How the host decides it (viewport width, user agent,
//! orientation, touch support) sits behind the [`CapabilityProbe`] trait,
//! and [`DeviceClassifier`] caches the answer until the next resize.

use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

static MOBILE_AGENT: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)Android|webOS|iPhone|iPad|iPod|BlackBerry|IEMobile|Opera Mini")
        .expect("user agent pattern is valid")
});

/// Rendering mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DeviceClass {
    /// Desktop layout: several cards per sheet, show/hide paging.
    #[default]
    Large,
    /// Mobile layout: one face per sheet, scroll navigation.
    Small,
}

impl DeviceClass {
    /// Whether this is the small (mobile) layout.
    #[must_use]
    pub const fn is_small(self) -> bool {
        matches!(self, Self::Small)
    }
}

impl std::fmt::Display for DeviceClass {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            Self::Large => "large",
            Self::Small => "small",
        })
    }
}

/// Snapshot of the host's viewport capabilities.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Viewport {
    /// Inner width in CSS pixels.
    pub width: u32,
    /// Inner height in CSS pixels.
    pub height: u32,
    /// Raw user agent string.
    pub user_agent: String,
    /// Orientation angle in degrees, when the host reports one.
    pub orientation: Option<i32>,
    /// Whether touch input is available.
    pub touch: bool,
}

impl Viewport {
    /// A representative viewport for a class the caller already knows,
    /// e.g. from a `?device=` hint or a CLI flag.
    #[must_use]
    pub fn for_class(class: DeviceClass) -> Self {
        match class {
            DeviceClass::Large => Self {
                width: 1280,
                height: 800,
                ..Self::default()
            },
            DeviceClass::Small => Self {
                width: 390,
                height: 844,
                touch: true,
                ..Self::default()
            },
        }
    }

    /// Classifies the viewport.
    ///
    /// Small when any of: width at or below `small_max_width`, a mobile user
    /// agent, a non-zero orientation angle, or touch support.
    #[must_use]
    pub fn classify(&self, small_max_width: u32) -> DeviceClass {
        let small = self.width <= small_max_width
            || MOBILE_AGENT.is_match(&self.user_agent)
            || self.orientation.is_some_and(|angle| angle != 0)
            || self.touch;
        if small {
            DeviceClass::Small
        } else {
            DeviceClass::Large
        }
    }
}

/// Source of viewport information.
pub trait CapabilityProbe {
    /// Current viewport state.
    fn viewport(&self) -> Viewport;
}

/// Probe that always reports the same viewport.
#[derive(Debug, Clone, Default)]
pub struct FixedProbe(pub Viewport);

impl CapabilityProbe for FixedProbe {
    fn viewport(&self) -> Viewport {
        self.0.clone()
    }
}

/// Caching classifier.
///
/// The first [`classify`](Self::classify) call queries the probe; later
/// calls reuse the answer until [`invalidate`](Self::invalidate).
#[derive(Debug)]
pub struct DeviceClassifier<P> {
    probe: P,
    small_max_width: u32,
    cached: Option<DeviceClass>,
}

impl<P: CapabilityProbe> DeviceClassifier<P> {
    /// Creates a classifier with an empty cache.
    pub const fn new(probe: P, small_max_width: u32) -> Self {
        Self {
            probe,
            small_max_width,
            cached: None,
        }
    }

    /// Returns the cached class, querying the probe on a miss.
    pub fn classify(&mut self) -> DeviceClass {
        if let Some(class) = self.cached {
            return class;
        }
        let viewport = self.probe.viewport();
        let class = viewport.classify(self.small_max_width);
        tracing::debug!(
            width = viewport.width,
            orientation = ?viewport.orientation,
            touch = viewport.touch,
            %class,
            "device classified"
        );
        self.cached = Some(class);
        class
    }

    /// Drops the cached answer. Called on resize.
    pub fn invalidate(&mut self) {
        self.cached = None;
    }

    /// Mutable access to the probe, e.g. to feed it a new viewport.
    pub fn probe_mut(&mut self) -> &mut P {
        &mut self.probe
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;

    const DESKTOP_UA: &str = "Mozilla/5.0 (X11; Linux x86_64) Gecko/20100101 Firefox/128.0";

    fn desktop(width: u32) -> Viewport {
        Viewport {
            width,
            height: 900,
            user_agent: DESKTOP_UA.to_string(),
            orientation: None,
            touch: false,
        }
    }

    #[test]
    fn wide_desktop_is_large() {
        assert_eq!(desktop(1280).classify(768), DeviceClass::Large);
    }

    #[test]
    fn narrow_width_is_small() {
        assert_eq!(desktop(768).classify(768), DeviceClass::Small);
        assert_eq!(desktop(769).classify(768), DeviceClass::Large);
    }

    #[test]
    fn mobile_agent_is_small() {
        let mut vp = desktop(1280);
        vp.user_agent = "Mozilla/5.0 (iPad; CPU OS 17_0 like Mac OS X)".to_string();
        assert_eq!(vp.classify(768), DeviceClass::Small);
        vp.user_agent = "opera mini/8".to_string();
        assert_eq!(vp.classify(768), DeviceClass::Small);
    }

    #[test]
    fn rotated_or_touch_is_small() {
        let mut vp = desktop(1280);
        vp.orientation = Some(90);
        assert_eq!(vp.classify(768), DeviceClass::Small);
        vp.orientation = Some(0);
        assert_eq!(vp.classify(768), DeviceClass::Large);
        vp.touch = true;
        assert_eq!(vp.classify(768), DeviceClass::Small);
    }

    struct CountingProbe {
        viewport: Viewport,
        calls: Cell<usize>,
    }

    impl CapabilityProbe for CountingProbe {
        fn viewport(&self) -> Viewport {
            self.calls.set(self.calls.get() + 1);
            self.viewport.clone()
        }
    }

    #[test]
    fn classifier_caches_until_invalidated() {
        let probe = CountingProbe {
            viewport: desktop(1280),
            calls: Cell::new(0),
        };
        let mut classifier = DeviceClassifier::new(probe, 768);
        assert_eq!(classifier.classify(), DeviceClass::Large);
        classifier.probe_mut().viewport.width = 400;
        assert_eq!(classifier.classify(), DeviceClass::Large, "stale until invalidated");
        assert_eq!(classifier.probe_mut().calls.get(), 1);

        classifier.invalidate();
        assert_eq!(classifier.classify(), DeviceClass::Small);
        assert_eq!(classifier.probe_mut().calls.get(), 2);
    }

    #[test]
    fn representative_viewports_round_trip() {
        for class in [DeviceClass::Large, DeviceClass::Small] {
            assert_eq!(Viewport::for_class(class).classify(768), class);
        }
    }

    #[test]
    fn device_class_serde_lowercase() {
        let json = serde_json::to_string(&DeviceClass::Small).unwrap();
        assert_eq!(json, "\"small\"");
    }
}
