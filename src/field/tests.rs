// field/tests.rs
// Field components, clamping and force helpers

use super::*;

fn field() -> MagneticField {
    MagneticField::default()
}

#[cfg(test)]
mod components {
    use super::*;

    #[test]
    fn poloidal_strength_from_safety_factor() {
        let f = field();
        let expected = 8.0 * 0.4 / (1.2 * 3.0);
        assert!((f.b_poloidal - expected).abs() < 1e-6);
    }

    #[test]
    fn on_axis_field_is_purely_toroidal() {
        let f = field();
        let b = f.field_at(Vec3::new(1.2, 0.0, 0.0));
        // Toroidal direction at (R, 0, 0) is +z
        assert!((b.z - 8.0).abs() < 1e-4, "b = {:?}", b);
        assert!(b.x.abs() < 1e-3 && b.y.abs() < 1e-3);
    }

    #[test]
    fn toroidal_field_falls_off_as_one_over_r() {
        let f = field();
        let inner = f.toroidal_magnitude(Vec3::new(0.9, 0.0, 0.0));
        let outer = f.toroidal_magnitude(Vec3::new(1.5, 0.0, 0.0));
        assert!((inner * 0.9 - outer * 1.5).abs() < 1e-4);
        assert!(inner > outer);
    }

    #[test]
    fn toroidal_field_finite_on_symmetry_axis() {
        let f = field();
        let b = f.field_at(Vec3::new(0.0, 0.2, 0.0));
        assert!(b.x.is_finite() && b.y.is_finite() && b.z.is_finite());
    }

    #[test]
    fn poloidal_field_is_perpendicular_to_radius_and_capped() {
        let f = field();
        let p = Vec3::new(1.2, 0.2, 0.0);
        let bp = f.poloidal_field(p);
        let radial = p - Vec3::new(1.2, 0.0, 0.0);
        assert!(bp.dot(radial).abs() < 1e-6);
        assert!((bp.mag() - f.b_poloidal * 0.5).abs() < 1e-5);

        let far = f.poloidal_field(Vec3::new(1.2, 3.0, 0.0));
        assert!((far.mag() - 2.0 * f.b_poloidal).abs() < 1e-5);
    }

    #[test]
    fn degenerate_parameters_are_clamped() {
        let f = MagneticField::new(1.2, 0.4, 8.0, 0.0);
        assert_eq!(f.safety_factor, config::SAFETY_FACTOR_RANGE.0);
        assert!(f.b_poloidal.is_finite());
        let f = MagneticField::new(-1.2, 0.4, f32::NAN, 3.0);
        assert!(f.major_radius > 0.0 && f.minor_radius < f.major_radius);
        assert_eq!(f.b_toroidal, config::TOROIDAL_FIELD);
        assert!(f.b_poloidal > 0.0);
    }
}

#[cfg(test)]
mod forces {
    use super::*;

    #[test]
    fn lorentz_force_is_perpendicular_to_velocity() {
        let v = Vec3::new(1.0, 2.0, -0.5);
        let b = Vec3::new(0.0, 0.0, 8.0);
        let force = lorentz_force(v, b, units::ELEMENTARY_CHARGE);
        assert!(force.dot(v).abs() <= 1e-5 * force.mag() * v.mag());
        // v x B for v = x, B = z is -y
        let f = lorentz_force(Vec3::unit_x(), Vec3::unit_z(), 2.0);
        assert_eq!(f, Vec3::new(0.0, -2.0, 0.0));
    }

    #[test]
    fn mirror_force_pushes_toward_weaker_field() {
        let f = field();
        // |B| grows toward the symmetry axis, so the mirror force points outward (+x)
        let force = f.mirror_force(Vec3::new(1.2, 0.0, 0.0), Vec3::new(0.3, 0.0, 0.0), 3.344e-27);
        assert!(force.x > 0.0, "force = {:?}", force);
        assert_eq!(f.mirror_force(Vec3::new(1.2, 0.0, 0.0), Vec3::zero(), 3.344e-27), Vec3::zero());
    }

    #[test]
    fn evaluation_does_not_mutate_field() {
        let f = field();
        let before = f;
        let _ = f.mirror_force(Vec3::new(1.0, 0.1, 0.3), Vec3::new(0.1, 0.2, 0.3), 1e-27);
        let _ = f.field_at(Vec3::new(1.0, 0.1, 0.3));
        assert_eq!(f, before);
    }

    #[test]
    fn larmor_radius_for_neutral_particle_is_huge() {
        let f = field();
        assert_eq!(f.larmor_radius(1.675e-27, 1e6, 0.0), 1e6);
        let r = f.larmor_radius(3.344e-27, 1e6, units::ELEMENTARY_CHARGE);
        assert!(r > 0.0 && r < 0.01);
    }

    #[test]
    fn magnetic_pressure_on_axis() {
        let f = field();
        let p = f.magnetic_pressure(Vec3::new(1.2, 0.0, 0.0));
        let expected = 64.0 / (2.0 * units::VACUUM_PERMEABILITY);
        assert!((p - expected).abs() / expected < 1e-3);
    }
}
