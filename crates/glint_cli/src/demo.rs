//! Built-in demo scene exercising every primitive and light type.

use glint_math::{Ray, Vec3};
use glint_renderer::{
    AmbientLight, Color, Cylinder, DirectionalLight, GeometryResult, Material, Plane, PointLight, Polygon,
    Scene, Sphere, SpotLight,
};

pub fn build_scene() -> GeometryResult<Scene> {
    let floor = Plane::new(Vec3::new(0.0, -1.0, 0.0), Vec3::Y)?.with_material(
        Material::new()
            .with_kd(Color::new(0.5, 0.5, 0.55))
            .with_kr(0.2),
    );

    let mirror_ball = Sphere::new(Vec3::new(-1.6, 0.0, -6.0), 1.0)?
        .with_emission(Color::new(0.05, 0.05, 0.1))
        .with_material(Material::new().with_kd(0.2).with_ks(0.8).with_shininess(80).with_kr(0.6));

    let glass_ball = Sphere::new(Vec3::new(0.9, -0.3, -4.5), 0.7)?
        .with_emission(Color::new(0.1, 0.02, 0.02))
        .with_material(Material::new().with_kd(0.2).with_ks(0.6).with_shininess(120).with_kt(0.6));

    let pillar = Cylinder::new(Ray::new(Vec3::new(2.4, -1.0, -7.5), Vec3::Y)?, 0.5, 2.5)?
        .with_emission(Color::new(0.1, 0.08, 0.0))
        .with_material(Material::new().with_kd(0.5).with_ks(0.4).with_shininess(30));

    let back_panel = Polygon::new(vec![
        Vec3::new(-4.0, -1.0, -10.0),
        Vec3::new(4.0, -1.0, -10.0),
        Vec3::new(4.0, 3.0, -10.0),
        Vec3::new(-4.0, 3.0, -10.0),
    ])?
    .with_material(Material::new().with_kd(Color::new(0.3, 0.4, 0.6)).with_kr(0.3));

    let wedge = Polygon::triangle(
        Vec3::new(-3.2, -1.0, -4.0),
        Vec3::new(-2.2, -1.0, -3.5),
        Vec3::new(-2.7, 0.2, -3.8),
    )?
    .with_emission(Color::new(0.0, 0.15, 0.05))
    .with_material(Material::new().with_kd(0.4).with_ks(0.2).with_shininess(10));

    let scene = Scene::builder("demo")
        .background(Color::new(0.02, 0.02, 0.05))
        .ambient_light(AmbientLight::new(Color::ONE, 0.15))
        .geometry(floor)
        .geometry(mirror_ball)
        .geometry(glass_ball)
        .geometry(pillar)
        .geometry(back_panel)
        .geometry(wedge)
        .light(
            SpotLight::new(Color::new(1.0, 0.9, 0.7), Vec3::new(-3.0, 4.0, -2.0), Vec3::new(1.0, -2.0, -2.0))?
                .with_kl(0.02)
                .with_kq(0.005)
                .with_narrow_beam(4),
        )
        .light(
            PointLight::new(Color::new(0.5, 0.6, 0.8), Vec3::new(3.0, 3.0, -3.0))
                .with_kl(0.05)
                .with_kq(0.01),
        )
        .light(DirectionalLight::new(Color::splat(0.2), Vec3::new(0.5, -1.0, -0.3))?)
        .build();

    Ok(scene)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_demo_scene_builds() {
        let scene = build_scene().unwrap();
        assert_eq!(scene.geometries().len(), 6);
        assert_eq!(scene.lights().len(), 3);
    }
}
