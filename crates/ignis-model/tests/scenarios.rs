//! End-to-end scenarios over the deterministic mock kernel: alignment
//! contact, selector queries, tag persistence, validators and registries.

use approx::assert_relative_eq;

use ignis_model::{
    Axis, FaceSide, FilterBy, ModelError, SortBy, TaggedElement, Workbench,
};

#[test]
fn stacked_boxes_touch_exactly() {
    let wb = Workbench::mock();
    let base = wb.cuboid(10.0, 10.0, 10.0).unwrap();
    let lid = wb.cuboid(4.0, 4.0, 2.0).unwrap();

    let placed = lid.on_top_of(&base, 0.0).unwrap();
    // No gap, no overlap: lid bottom = base top.
    assert_relative_eq!(placed.bbox().min[2], base.bbox().max[2]);
    // Unspecified axes center on the target.
    assert_relative_eq!(placed.bbox().center()[0], 0.0);
    assert_relative_eq!(placed.bbox().center()[1], 0.0);
}

#[test]
fn all_six_aliases_place_on_the_right_side() {
    let wb = Workbench::mock();
    let target = wb.cuboid(6.0, 6.0, 6.0).unwrap();
    let part = wb.cuboid(2.0, 2.0, 2.0).unwrap();

    assert_relative_eq!(part.on_top_of(&target, 0.0).unwrap().bbox().min[2], 3.0);
    assert_relative_eq!(part.under(&target, 0.0).unwrap().bbox().max[2], -3.0);
    assert_relative_eq!(part.right_of(&target, 0.0).unwrap().bbox().min[0], 3.0);
    assert_relative_eq!(part.left_of(&target, 0.0).unwrap().bbox().max[0], -3.0);
    assert_relative_eq!(part.behind(&target, 0.0).unwrap().bbox().min[1], 3.0);
    assert_relative_eq!(part.in_front_of(&target, 0.0).unwrap().bbox().max[1], -3.0);
}

#[test]
fn symmetric_offsets_round_trip_around_contact() {
    let wb = Workbench::mock();
    let target = wb.cuboid(8.0, 8.0, 8.0).unwrap();
    let part = wb.cuboid(2.0, 2.0, 2.0).unwrap();

    let contact = part.align(&target, FaceSide::Top, 0.0).unwrap();
    let plus = part.align(&target, FaceSide::Top, 1.5).unwrap();
    let minus = part.align(&target, FaceSide::Top, -1.5).unwrap();

    let mid = (plus.bbox().center()[2] + minus.bbox().center()[2]) / 2.0;
    assert_relative_eq!(mid, contact.bbox().center()[2]);

    // Placement is absolute: aligning an already-aligned part is a no-op.
    let again = plus.align(&target, FaceSide::Top, 1.5).unwrap();
    assert_relative_eq!(again.bbox().center()[2], plus.bbox().center()[2]);
}

#[test]
fn unknown_face_name_is_invalid_argument() {
    let wb = Workbench::mock();
    let a = wb.cuboid(1.0, 1.0, 1.0).unwrap();
    let b = wb.cuboid(1.0, 1.0, 1.0).unwrap();

    let err = a.align_named(&b, "diagonal", 0.0).unwrap_err();
    match err {
        ModelError::InvalidArgument { reason } => {
            assert!(reason.contains("diagonal"));
            assert!(reason.contains("top/bottom/left/right/front/back"));
        }
        other => panic!("unexpected error: {other:?}"),
    }
    assert!(a.align_named(&b, "BACK", 0.0).is_ok());
}

#[test]
fn ten_cube_face_census() {
    let wb = Workbench::mock();
    let cube = wb.cuboid(10.0, 10.0, 10.0).unwrap();

    let faces = cube.faces();
    assert_eq!(faces.len(), 6);
    for face in faces.iter() {
        assert_relative_eq!(face.area, 100.0);
    }
    assert_relative_eq!(faces.top().first().unwrap().center[2], 5.0);
    assert_relative_eq!(faces.bottom().first().unwrap().center[2], -5.0);
}

#[test]
fn union_face_areas_span_both_parts() {
    let wb = Workbench::mock();
    let big = wb.cuboid(10.0, 10.0, 10.0).unwrap();
    let small = wb
        .cuboid(5.0, 5.0, 5.0)
        .unwrap()
        .on_top_of(&big, 0.0)
        .unwrap();

    let merged = big.union(&small).unwrap();
    let areas = merged.faces().sort_by_area();
    assert_relative_eq!(areas.first().unwrap().area, 25.0);
    assert_relative_eq!(areas.last().unwrap().area, 100.0);
}

#[test]
fn filter_then_sort_stays_within_the_filtered_set() {
    let wb = Workbench::mock();
    let cube = wb.cuboid(10.0, 10.0, 10.0).unwrap();

    let all = cube.faces();
    let upper = all.filter_by(FilterBy::Axis(Axis::Z));
    let sorted = upper.sort_by(SortBy::Axis(Axis::X), true);

    assert!(sorted.len() <= all.len());
    assert_eq!(sorted.len(), upper.len());
    assert!(sorted.iter().all(|f| f.center[2] > 0.0));
}

#[test]
fn empty_selection_yields_none_not_panic() {
    let wb = Workbench::mock();
    let cube = wb.cuboid(2.0, 2.0, 2.0).unwrap();

    let none = cube
        .faces()
        .filter_by(FilterBy::predicate(|f: &ignis_model::FaceRef| f.area > 1e9));
    assert!(none.is_empty());
    assert!(none.first().is_none());
    assert!(none.last().is_none());
    assert!(none.top().is_empty());
}

#[test]
fn tags_survive_a_fillet() {
    let wb = Workbench::mock();
    let cube = wb.cuboid(6.0, 6.0, 6.0).unwrap();

    cube.faces().top().tag("lid_seat").unwrap();
    assert_eq!(cube.get_by_tag("lid_seat").len(), 1);

    let rounded = cube.fillet(0.5, None).unwrap();
    let carried = rounded.get_by_tag("lid_seat");
    assert_eq!(carried.len(), 1);
    assert!(matches!(carried[0], TaggedElement::Face(_)));

    // Tagging accumulates instead of overwriting.
    rounded.faces().bottom().tag("lid_seat").unwrap();
    assert_eq!(rounded.get_by_tag("lid_seat").len(), 2);
}

#[test]
fn face_selection_fillet_consumes_bounding_edges() {
    let wb = Workbench::mock();
    let cube = wb.cuboid(4.0, 4.0, 4.0).unwrap();

    let rounded = cube.faces().top().fillet(0.5).unwrap();
    // The top face has 4 bounding edges; each becomes a blend face.
    assert_eq!(rounded.faces().len(), 6 + 4);
    let blends = rounded
        .faces()
        .iter()
        .filter(|f| f.surface_type == "cylindrical")
        .count();
    assert_eq!(blends, 4);
}

#[test]
fn face_intersecting_finds_the_contact_face() {
    let wb = Workbench::mock();
    let base = wb.cuboid(10.0, 10.0, 10.0).unwrap();
    let lid = wb
        .cuboid(4.0, 4.0, 2.0)
        .unwrap()
        .on_top_of(&base, -0.5)
        .unwrap();

    let touching = base.faces().face_intersecting(&lid, 0.01).unwrap();
    assert_eq!(touching.len(), 1);
    assert_relative_eq!(touching.first().unwrap().center[2], 5.0);

    let far = wb
        .cuboid(1.0, 1.0, 1.0)
        .unwrap()
        .on_top_of(&base, 50.0)
        .unwrap();
    assert!(base.faces().face_intersecting(&far, 0.01).unwrap().is_empty());
}

#[test]
fn subtract_and_intersect_chain() {
    let wb = Workbench::mock();
    let plate = wb.cuboid(20.0, 20.0, 4.0).unwrap();
    let hole = wb.iso_hole("M4", 6.0, ignis_model::IsoFit::Normal).unwrap();

    let drilled = plate.subtract(&hole).unwrap();
    assert_relative_eq!(drilled.bbox().size()[2], 4.0);

    let other = wb.cuboid(20.0, 20.0, 4.0).unwrap().translate(10.0, 0.0, 0.0).unwrap();
    let common = plate.intersect(&other).unwrap();
    assert_relative_eq!(common.bbox().size()[0], 10.0);
}

#[test]
fn model_registry_returns_pre_union_parts() {
    let wb = Workbench::mock();
    let base = wb.cuboid(10.0, 10.0, 10.0).unwrap().named("base");
    let lid = wb
        .cuboid(4.0, 4.0, 2.0)
        .unwrap()
        .named("lid")
        .on_top_of(&base, 0.0)
        .unwrap();
    let lid_bbox = lid.bbox();

    let model = wb.model("case").push(base).unwrap().push(lid).unwrap();

    // The registry holds the pre-union geometry, not the composite.
    let found = model.find("lid").unwrap();
    assert_eq!(found.bbox(), lid_bbox);

    let err = model.find("hinge").unwrap_err();
    match err {
        ModelError::NotFound { name } => assert_eq!(name, "hinge"),
        other => panic!("unexpected error: {other:?}"),
    }

    let composite = model.finish().unwrap();
    assert_eq!(composite.name(), Some("case"));
    assert_relative_eq!(composite.bbox().max[2], 7.0);
}

#[test]
fn group_finishes_into_an_alignable_entity() {
    let wb = Workbench::mock();
    let a = wb.cuboid(2.0, 2.0, 2.0).unwrap();
    let b = wb.cuboid(2.0, 2.0, 2.0).unwrap().right_of(&a, 0.0).unwrap();

    let pair = wb.group().push(a).unwrap().push(b).unwrap().finish().unwrap();
    assert_relative_eq!(pair.bbox().size()[0], 4.0);

    let shelf = wb.cuboid(10.0, 10.0, 1.0).unwrap();
    let placed = pair.on_top_of(&shelf, 0.0).unwrap();
    assert_relative_eq!(placed.bbox().min[2], 0.5);
}

#[test]
fn shell_hollows_while_keeping_outer_extents() {
    let wb = Workbench::mock();
    let cube = wb.cuboid(10.0, 10.0, 10.0).unwrap();

    let hollow = cube.shell(1.0).unwrap();
    assert_eq!(hollow.bbox(), cube.bbox());
    // Cavity walls double the face count.
    assert_eq!(hollow.faces().len(), 12);

    // Too-thick walls leave no interior.
    let thin = wb.cuboid(2.0, 2.0, 2.0).unwrap();
    assert!(thin.shell(1.5).is_err());
}

#[test]
fn offset_round_trip_restores_extents() {
    let wb = Workbench::mock();
    let cube = wb.cuboid(6.0, 6.0, 6.0).unwrap();

    let grown = cube.offset(1.0).unwrap();
    assert_relative_eq!(grown.bbox().size()[0], 8.0);

    let back = grown.offset(-1.0).unwrap();
    assert_eq!(back.bbox(), cube.bbox());
}

#[test]
fn compound_offset_falls_back_to_faces() {
    let wb = Workbench::mock();
    let a = wb.cuboid(4.0, 4.0, 1.0).unwrap();
    let b = wb
        .cuboid(4.0, 4.0, 1.0)
        .unwrap()
        .translate(10.0, 0.0, 0.0)
        .unwrap();

    // A group of disjoint parts is a compound; whole-shape offset is
    // rejected and the per-face fallback must carry it.
    let compound = wb.group().push(a).unwrap().push(b).unwrap().finish().unwrap();
    let padded = compound.offset(0.5).unwrap();
    assert!(padded.bbox().size()[0] >= compound.bbox().size()[0]);
}

#[test]
fn rotation_order_is_x_then_y_then_z() {
    let wb = Workbench::mock();
    let slab = wb.cuboid(2.0, 4.0, 6.0).unwrap();

    let turned = slab.rotate(90.0, 0.0, 90.0).unwrap();
    // X first maps extents (2,4,6) -> (2,6,4); Z then maps -> (6,2,4).
    let size = turned.bbox().size();
    assert_relative_eq!(size[0], 6.0, max_relative = 1e-9);
    assert_relative_eq!(size[1], 2.0, max_relative = 1e-9);
    assert_relative_eq!(size[2], 4.0, max_relative = 1e-9);
}

#[test]
fn convenience_readers_match_the_bbox() {
    let wb = Workbench::mock();
    let cyl = wb.cylinder(3.0, 8.0).unwrap();
    assert_relative_eq!(cyl.top(), 4.0);
    assert_relative_eq!(cyl.right(), 3.0);
    assert_relative_eq!(cyl.radius(), 3.0);
}

#[test]
fn closest_vertex_query() {
    let wb = Workbench::mock();
    let cube = wb.cuboid(2.0, 2.0, 2.0).unwrap();

    let corner = cube.vertices().closest_to([5.0, 5.0, 5.0]);
    let v = corner.first().unwrap();
    assert_relative_eq!(v.position[0], 1.0);
    assert_relative_eq!(v.position[1], 1.0);
    assert_relative_eq!(v.position[2], 1.0);
}
