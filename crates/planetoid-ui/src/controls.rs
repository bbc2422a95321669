//! The panel's controls and how their values land in the uniform tables.
//!
//! Binding is one way: a change event is converted and written into the
//! target table, and the next frame uploads it. Nothing is read back.

use planetoid_scene::{Surface, SurfaceUniforms, UniformError, UniformTable};

use crate::color::normalize_rgb;

/// Slider range and step.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SliderSpec {
    pub min: f32,
    pub max: f32,
    pub step: f32,
}

impl SliderSpec {
    pub const fn new(min: f32, max: f32, step: f32) -> Self {
        Self { min, max, step }
    }

    /// Clamp to `[min, max]` and snap to the step grid anchored at `min`.
    pub fn constrain(&self, value: f32) -> f32 {
        if value.is_nan() {
            return self.min;
        }
        if value <= self.min {
            return self.min;
        }
        if value >= self.max {
            return self.max;
        }
        if self.step <= 0.0 {
            return value;
        }
        let steps = ((value - self.min) / self.step).round();
        let snapped = (self.min + steps * self.step).clamp(self.min, self.max);
        // Values already on the grid come back unchanged, not re-rounded.
        if (snapped - value).abs() <= self.step * 1e-3 {
            value
        } else {
            snapped
        }
    }
}

/// Which table a control writes to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UniformTarget {
    Shared,
    Surface(Surface),
}

impl UniformTarget {
    fn table_mut(self, uniforms: &mut SurfaceUniforms) -> &mut UniformTable {
        match self {
            UniformTarget::Shared => &mut uniforms.shared,
            UniformTarget::Surface(surface) => uniforms.extension_mut(surface),
        }
    }

    fn table(self, uniforms: &SurfaceUniforms) -> &UniformTable {
        match self {
            UniformTarget::Shared => &uniforms.shared,
            UniformTarget::Surface(surface) => uniforms.extension(surface),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ControlId {
    PlanetSurfaceColor,
    Temperature,
    MountFreq,
    MountAmp,
    OceanColor,
    SandColor,
    OceanLevel,
    AtmoHeight,
    AtmoOpacity,
    AtmoColor,
    MoonSurfaceColor,
    MoonSpeed,
    MoonMountFreq,
    MoonMountAmp,
}

impl ControlId {
    /// Panel order.
    pub const ALL: [ControlId; 14] = [
        ControlId::PlanetSurfaceColor,
        ControlId::Temperature,
        ControlId::MountFreq,
        ControlId::MountAmp,
        ControlId::OceanColor,
        ControlId::SandColor,
        ControlId::OceanLevel,
        ControlId::AtmoHeight,
        ControlId::AtmoOpacity,
        ControlId::AtmoColor,
        ControlId::MoonSurfaceColor,
        ControlId::MoonSpeed,
        ControlId::MoonMountFreq,
        ControlId::MoonMountAmp,
    ];

    pub const FOLDERS: [&'static str; 4] = ["Planet", "Ocean", "Atmosphere", "Moon"];

    pub fn folder(self) -> &'static str {
        use ControlId::*;
        match self {
            PlanetSurfaceColor | Temperature | MountFreq | MountAmp => "Planet",
            OceanColor | SandColor | OceanLevel => "Ocean",
            AtmoHeight | AtmoOpacity | AtmoColor => "Atmosphere",
            MoonSurfaceColor | MoonSpeed | MoonMountFreq | MoonMountAmp => "Moon",
        }
    }

    pub fn label(self) -> &'static str {
        use ControlId::*;
        match self {
            PlanetSurfaceColor | MoonSurfaceColor => "Surface Color",
            Temperature => "Temperature",
            MountFreq | MoonMountFreq => "Mount freq",
            MountAmp | MoonMountAmp => "Mount amp",
            OceanColor => "Ocean Color",
            SandColor => "Sand Color",
            OceanLevel => "Ocean level",
            AtmoHeight => "Height",
            AtmoOpacity => "Opacity",
            AtmoColor => "Color",
            MoonSpeed => "Moon speed",
        }
    }

    /// Table and uniform name the control writes.
    pub fn target(self) -> (UniformTarget, &'static str) {
        use ControlId::*;
        use UniformTarget::Shared;
        let planet = UniformTarget::Surface(Surface::Planet);
        let ocean = UniformTarget::Surface(Surface::Ocean);
        let atmosphere = UniformTarget::Surface(Surface::Atmosphere);
        let moon = UniformTarget::Surface(Surface::Moon);
        match self {
            PlanetSurfaceColor => (planet, "surfaceColor"),
            Temperature => (Shared, "avTemp"),
            MountFreq => (planet, "mountFreq"),
            MountAmp => (planet, "mountAmp"),
            OceanColor => (ocean, "oceanColor"),
            SandColor => (planet, "shoreColor"),
            OceanLevel => (Shared, "oceanLevel"),
            AtmoHeight => (atmosphere, "atmoHeight"),
            AtmoOpacity => (atmosphere, "atmoOpacity"),
            AtmoColor => (atmosphere, "atmoColor"),
            MoonSurfaceColor => (moon, "surfaceColor"),
            MoonSpeed => (moon, "moonSpeed"),
            MoonMountFreq => (moon, "moonMountFreq"),
            MoonMountAmp => (moon, "moonMountAmp"),
        }
    }

    /// Range of a scalar control; `None` for color pickers.
    pub fn slider(self) -> Option<SliderSpec> {
        use ControlId::*;
        match self {
            Temperature => Some(SliderSpec::new(-12.0, 35.0, 0.01)),
            MountFreq => Some(SliderSpec::new(0.02, 0.1, 0.001)),
            MountAmp => Some(SliderSpec::new(2.0, 30.0, 0.01)),
            OceanLevel => Some(SliderSpec::new(0.0, 10.0, 0.01)),
            AtmoHeight => Some(SliderSpec::new(0.0, 30.0, 0.1)),
            AtmoOpacity => Some(SliderSpec::new(0.0, 1.0, 0.01)),
            MoonSpeed => Some(SliderSpec::new(0.001, 0.1, 0.001)),
            MoonMountFreq => Some(SliderSpec::new(0.1, 0.5, 0.001)),
            MoonMountAmp => Some(SliderSpec::new(2.0, 10.0, 0.01)),
            PlanetSurfaceColor | OceanColor | SandColor | AtmoColor | MoonSurfaceColor => None,
        }
    }

    pub fn is_color(self) -> bool {
        self.slider().is_none()
    }

    /// Current value of the target uniform in the control's own units.
    pub fn read(self, uniforms: &SurfaceUniforms) -> Option<ControlValue> {
        let (target, name) = self.target();
        let table = target.table(uniforms);
        if self.is_color() {
            table
                .vec3(name)
                .map(|rgb| ControlValue::Color(crate::color::to_rgb8(rgb)))
        } else {
            table.float(name).map(ControlValue::Scalar)
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ControlValue {
    Scalar(f32),
    Color([u8; 3]),
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ControlChange {
    pub id: ControlId,
    pub value: ControlValue,
}

/// Write one change into its target uniform.
///
/// Scalars pass through the control's [`SliderSpec`], colors are normalized.
/// A scalar sent to a color control (or the reverse) fails with
/// [`UniformError::KindMismatch`].
pub fn apply(change: ControlChange, uniforms: &mut SurfaceUniforms) -> Result<(), UniformError> {
    let (target, name) = change.id.target();
    let table = target.table_mut(uniforms);
    match (change.value, change.id.slider()) {
        (ControlValue::Scalar(v), Some(spec)) => table.set(name, spec.constrain(v)),
        (ControlValue::Scalar(v), None) => table.set(name, v),
        (ControlValue::Color(rgb), _) => table.set(name, normalize_rgb(rgb)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_constrain_clamps_and_snaps() {
        let spec = SliderSpec::new(0.02, 0.1, 0.001);
        assert_eq!(spec.constrain(5.0), 0.1);
        assert_eq!(spec.constrain(-5.0), 0.02);
        assert!((spec.constrain(0.04449) - 0.044).abs() < 1e-6);
        assert_eq!(spec.constrain(f32::NAN), 0.02);
        assert_eq!(spec.constrain(f32::INFINITY), 0.1);
    }

    #[test]
    fn test_every_control_targets_an_existing_uniform() {
        let uniforms = SurfaceUniforms::default();
        for id in ControlId::ALL {
            assert!(id.read(&uniforms).is_some(), "{id:?}");
            assert!(ControlId::FOLDERS.contains(&id.folder()));
        }
    }

    #[test]
    fn test_default_values_sit_inside_slider_ranges() {
        let uniforms = SurfaceUniforms::default();
        for id in ControlId::ALL {
            if let (Some(spec), Some(ControlValue::Scalar(v))) = (id.slider(), id.read(&uniforms)) {
                assert!(v >= spec.min && v <= spec.max, "{id:?} = {v}");
            }
        }
    }

    #[test]
    fn test_apply_color_normalizes() {
        let mut uniforms = SurfaceUniforms::default();
        apply(
            ControlChange {
                id: ControlId::OceanColor,
                value: ControlValue::Color([255, 0, 51]),
            },
            &mut uniforms,
        )
        .unwrap();
        assert_eq!(uniforms.ocean.vec3("oceanColor"), Some([1.0, 0.0, 0.2]));
    }

    #[test]
    fn test_apply_shared_scalar_reaches_every_surface() {
        let mut uniforms = SurfaceUniforms::default();
        apply(
            ControlChange {
                id: ControlId::Temperature,
                value: ControlValue::Scalar(-3.5),
            },
            &mut uniforms,
        )
        .unwrap();
        for surface in Surface::ALL {
            assert_eq!(uniforms.merged(surface).float("avTemp"), Some(-3.5));
        }
    }

    #[test]
    fn test_apply_out_of_range_is_clamped() {
        let mut uniforms = SurfaceUniforms::default();
        apply(
            ControlChange {
                id: ControlId::MoonSpeed,
                value: ControlValue::Scalar(3.0),
            },
            &mut uniforms,
        )
        .unwrap();
        assert_eq!(uniforms.moon.float("moonSpeed"), Some(0.1));
    }

    #[test]
    fn test_sand_color_writes_planet_shore() {
        let (target, name) = ControlId::SandColor.target();
        assert_eq!(target, UniformTarget::Surface(Surface::Planet));
        assert_eq!(name, "shoreColor");
    }

    #[test]
    fn test_wrong_value_kind_is_rejected() {
        let mut uniforms = SurfaceUniforms::default();
        let err = apply(
            ControlChange {
                id: ControlId::OceanColor,
                value: ControlValue::Scalar(0.5),
            },
            &mut uniforms,
        )
        .unwrap_err();
        assert!(matches!(err, UniformError::KindMismatch { .. }));
    }
}
