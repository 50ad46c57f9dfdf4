use crate::{SceneObject, Vec3f};

// Props every scene carries; the collision harvester ignores them by name.
fn scenery(pad_at: Vec3f) -> Vec<SceneObject> {
    vec![
        SceneObject::block("ground", Vec3f::new(0.0, -1.0, 0.0), Vec3f::new(2000.0, 1.0, 2000.0)),
        SceneObject::block("landingPad", pad_at, Vec3f::new(8.0, 0.2, 8.0)),
        SceneObject::block("drone", Vec3f::ZERO, Vec3f::new(1.2, 0.4, 1.2)),
    ]
}

/// Downtown grid: blocks of towers between the arterials, with the
/// south-west/north-east diagonal left open as a plaza.
pub fn city_block_scene() -> SceneObject {
    let spacing = 60.0;
    let footprint = 20.0;
    let mut blocks = Vec::new();
    for i in -2i32..=2 {
        for j in -2i32..=2 {
            // Arterials run along x = 0 and z = 0.
            if i == 0 || j == 0 || i == j {
                continue;
            }
            let height = 20.0 + ((i * 37 + j * 23).rem_euclid(50)) as f32;
            let base = Vec3f::new(i as f32 * spacing, 0.0, j as f32 * spacing);
            blocks.push(
                SceneObject::block(format!("tower_{i}_{j}"), base, Vec3f::new(footprint, height, footprint))
                    .with_children(vec![SceneObject::block(
                        format!("tower_{i}_{j}_roof"),
                        Vec3f::new(0.0, height, 0.0),
                        Vec3f::new(4.0, 3.0, 4.0),
                    )]),
            );
        }
    }
    // Low kiosks along the avenues: too small to count as obstacles.
    for k in 1..=4 {
        let d = k as f32 * 35.0;
        blocks.push(SceneObject::block(format!("kiosk_{k}"), Vec3f::new(6.0, 0.0, d), Vec3f::new(1.0, 1.5, 1.0)));
    }

    let mut children = scenery(Vec3f::ZERO);
    children.push(SceneObject::group("downtown", Vec3f::ZERO, blocks));
    SceneObject::group("city", Vec3f::ZERO, children)
}

/// Ridge of peaks with a mesa landing site on top at (250, 100, 250).
pub fn mountain_scene() -> SceneObject {
    let peaks = [
        ("peak_west", Vec3f::new(-40.0, 0.0, 160.0), Vec3f::new(70.0, 140.0, 70.0)),
        ("peak_north", Vec3f::new(120.0, 0.0, 300.0), Vec3f::new(80.0, 160.0, 60.0)),
        ("peak_east", Vec3f::new(300.0, 0.0, 90.0), Vec3f::new(60.0, 120.0, 90.0)),
        ("foothill", Vec3f::new(180.0, 0.0, 40.0), Vec3f::new(50.0, 45.0, 50.0)),
    ];
    let mut ridge: Vec<SceneObject> = peaks
        .into_iter()
        .map(|(name, base, size)| SceneObject::block(name, base, size))
        .collect();
    // The mesa is the landing site, so it carries the pad's name.
    ridge.push(SceneObject::block("landingPad", Vec3f::new(250.0, 0.0, 250.0), Vec3f::new(30.0, 100.0, 30.0)));

    let mut children = scenery(Vec3f::ZERO);
    children.push(SceneObject::group("ridge", Vec3f::ZERO, ridge));
    SceneObject::group("mountain", Vec3f::ZERO, children)
}

/// Empty field for training flights.
pub fn open_field_scene() -> SceneObject {
    SceneObject::group("open_field", Vec3f::ZERO, scenery(Vec3f::ZERO))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::CollisionSystem;

    #[test]
    fn city_harvest_keeps_towers_only() {
        let mut sys = CollisionSystem::default();
        let n = sys.collect_buildings_from_scene(&city_block_scene());
        // 16 grid cells minus the arterials and the diagonal: 12 towers + 12 roofs.
        assert_eq!(n, 24);
        assert!(sys.obstacles().iter().all(|o| !o.source.0.starts_with("kiosk")));
    }

    #[test]
    fn open_field_has_no_obstacles() {
        let mut sys = CollisionSystem::default();
        assert_eq!(sys.collect_buildings_from_scene(&open_field_scene()), 0);
    }

    #[test]
    fn mountain_mesa_is_not_an_obstacle() {
        let mut sys = CollisionSystem::default();
        assert_eq!(sys.collect_buildings_from_scene(&mountain_scene()), 4);
    }
}
