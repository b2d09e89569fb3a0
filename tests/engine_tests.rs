mod common;

use common::*;
use octofhir_hl7v2::*;

#[test]
fn required_slots_materialize_at_construction() {
    let message = build_message();
    let root = message.root();

    assert_eq!(message.count_existing(root, "MSH").unwrap(), 1);
    assert_eq!(message.count_existing(root, "PATIENT").unwrap(), 0);
    assert_eq!(message.count_existing(root, "ORDER_OBSERVATION").unwrap(), 1);
}

#[test]
fn deep_default_construction_reaches_required_fields() {
    let message = build_message();
    let msh = message.find_segment("MSH", 0).unwrap();

    // MSH-1, MSH-2 and MSH-4 are required and already present; MSH-3 is
    // optional and is not.
    assert_eq!(message.field_reps(msh, 1).unwrap(), 1);
    assert_eq!(message.field_reps(msh, 2).unwrap(), 1);
    assert_eq!(message.field_reps(msh, 3).unwrap(), 0);
    assert_eq!(message.field_reps(msh, 4).unwrap(), 1);
}

#[test]
fn get_or_create_is_idempotent() {
    let mut message = build_message();
    let root = message.root();

    let patient = message.get_or_create(root, "PATIENT").unwrap();
    let again = message.get_or_create(root, "PATIENT").unwrap();
    assert_eq!(patient, again);

    let pid = message.get_or_create(patient, "PID").unwrap();
    assert_eq!(message.get_or_create(patient, "PID").unwrap(), pid);
    assert_eq!(message.kind(pid), NodeKind::Segment);
    assert_eq!(message.type_name(pid), "PID");
}

#[test]
fn count_always_equals_list_length() {
    let mut message = build_message();
    let root = message.root();
    let patient = message.get_or_create(root, "PATIENT").unwrap();

    assert_eq!(message.count_existing(patient, "NTE").unwrap(), 0);
    assert_eq!(message.list_existing(patient, "NTE").unwrap().len(), 0);

    for expected in 1..=4 {
        message
            .get_or_create_rep(patient, "NTE", expected - 1)
            .unwrap();
        assert_eq!(message.count_existing(patient, "NTE").unwrap(), expected);
        assert_eq!(
            message.list_existing(patient, "NTE").unwrap().len(),
            expected
        );
    }
}

#[test]
fn list_existing_never_creates() {
    let message = build_message();
    let root = message.root();

    let before = message.node_count();
    let listed = message.list_existing(root, "PATIENT").unwrap();
    assert!(listed.is_empty());
    assert_eq!(message.node_count(), before);
}

#[test]
fn repetitions_grow_by_exactly_one() {
    let mut message = build_message();
    let root = message.root();
    let patient = message.get_or_create(root, "PATIENT").unwrap();

    let first = message.get_or_create_rep(patient, "NTE", 0).unwrap();
    assert_eq!(message.count_existing(patient, "NTE").unwrap(), 1);

    // Within range returns the existing node.
    assert_eq!(message.get_or_create_rep(patient, "NTE", 0).unwrap(), first);

    // One past the end appends.
    let second = message.get_or_create_rep(patient, "NTE", 1).unwrap();
    assert_ne!(first, second);
    assert_eq!(message.count_existing(patient, "NTE").unwrap(), 2);

    // More than one past the end is a repetition-bounds error.
    let err = message.get_or_create_rep(patient, "NTE", 5).unwrap_err();
    assert!(matches!(err, Hl7ModelError::RepetitionBounds { .. }));
    assert_eq!(message.count_existing(patient, "NTE").unwrap(), 2);
}

#[test]
fn non_repeating_slot_rejects_second_repetition() {
    let mut message = build_message();
    let root = message.root();

    message.get_or_create(root, "PATIENT").unwrap();
    let err = message.get_or_create_rep(root, "PATIENT", 1).unwrap_err();
    assert!(matches!(err, Hl7ModelError::SchemaViolation { .. }));

    let err = message.insert_at(root, "PATIENT", 0).unwrap_err();
    assert!(matches!(err, Hl7ModelError::SchemaViolation { .. }));
}

#[test]
fn unknown_slot_is_a_schema_violation() {
    let mut message = build_message();
    let root = message.root();

    let err = message.get_or_create(root, "ZZZ").unwrap_err();
    assert!(matches!(err, Hl7ModelError::SchemaViolation { .. }));
    let err = message.count_existing(root, "ZZZ").unwrap_err();
    assert!(matches!(err, Hl7ModelError::SchemaViolation { .. }));
}

#[test]
fn insert_shift_semantics() {
    let mut message = build_message();
    let root = message.root();
    let patient = message.get_or_create(root, "PATIENT").unwrap();

    let a = message.insert_at(patient, "NTE", 0).unwrap();
    let b = message.insert_at(patient, "NTE", 0).unwrap();
    let c = message.insert_at(patient, "NTE", 2).unwrap();

    // Second insert at 0 shifts the first up; the third lands at the end.
    assert_eq!(message.list_existing(patient, "NTE").unwrap(), vec![b, a, c]);

    let err = message.insert_at(patient, "NTE", 5).unwrap_err();
    assert!(matches!(err, Hl7ModelError::RepetitionBounds { .. }));
}

#[test]
fn field_inserts_follow_the_same_shift_semantics() {
    let mut message = build_message();
    let root = message.root();
    let patient = message.get_or_create(root, "PATIENT").unwrap();
    let pid = message.get_or_create(patient, "PID").unwrap();

    // PID-2 (Race) is optional repeating and starts empty.
    let a = message.insert_field_rep(pid, 2, 0).unwrap();
    let b = message.insert_field_rep(pid, 2, 0).unwrap();
    let c = message.insert_field_rep(pid, 2, 2).unwrap();
    assert_eq!(message.field_all(pid, 2).unwrap(), vec![b, a, c]);

    let removed = message.remove_field_rep(pid, 2, 1).unwrap();
    assert_eq!(removed, a);
    assert_eq!(message.field_all(pid, 2).unwrap(), vec![b, c]);

    let err = message.remove_field_rep(pid, 2, 2).unwrap_err();
    assert!(matches!(err, Hl7ModelError::RepetitionBounds { .. }));
}

#[test]
fn insert_then_remove_round_trips() {
    let mut message = build_message();
    let root = message.root();
    let patient = message.get_or_create(root, "PATIENT").unwrap();

    let a = message.get_or_create_rep(patient, "NTE", 0).unwrap();
    let b = message.get_or_create_rep(patient, "NTE", 1).unwrap();
    let count = message.count_existing(patient, "NTE").unwrap();

    let inserted = message.insert_at(patient, "NTE", 1).unwrap();
    let removed = message.remove_at(patient, "NTE", 1).unwrap();
    assert_eq!(removed, inserted);
    assert_eq!(message.count_existing(patient, "NTE").unwrap(), count);
    assert_eq!(message.list_existing(patient, "NTE").unwrap(), vec![a, b]);
}

#[test]
fn remove_bounds_and_detached_nodes() {
    let mut message = build_message();
    let root = message.root();
    let patient = message.get_or_create(root, "PATIENT").unwrap();

    let err = message.remove_at(patient, "NTE", 0).unwrap_err();
    assert!(matches!(err, Hl7ModelError::RepetitionBounds { .. }));

    let nte = message.get_or_create_rep(patient, "NTE", 0).unwrap();
    let comment = message.field(nte, 3).unwrap();
    message.set_value(comment, "kept after removal").unwrap();

    let removed = message.remove_at(patient, "NTE", 0).unwrap();
    assert_eq!(removed, nte);
    assert_eq!(message.count_existing(patient, "NTE").unwrap(), 0);
    // The detached subtree stays readable until the message is dropped.
    assert_eq!(message.value(comment).unwrap(), "kept after removal");
}

#[test]
fn three_field_segment_scenario() {
    let mut message = build_message();
    let root = message.root();
    let patient = message.get_or_create(root, "PATIENT").unwrap();
    let pid = message.get_or_create(patient, "PID").unwrap();

    // Optional repeating field starts empty.
    assert_eq!(message.field_reps(pid, 2).unwrap(), 0);

    // Required non-repeating field: present, idempotent.
    let set_id = message.field(pid, 1).unwrap();
    assert_eq!(message.field(pid, 1).unwrap(), set_id);
    assert_eq!(message.field_reps(pid, 1).unwrap(), 1);

    // Required repeating field: first repetition accessible, growth
    // beyond count+1 rejected.
    assert!(message.field_rep(pid, 3, 0).is_ok());
    let err = message.field_rep(pid, 3, 5).unwrap_err();
    assert!(matches!(err, Hl7ModelError::RepetitionBounds { .. }));
}

#[test]
fn field_number_outside_schema_is_schema_violation() {
    let mut message = build_message();
    let root = message.root();
    let patient = message.get_or_create(root, "PATIENT").unwrap();
    let pid = message.get_or_create(patient, "PID").unwrap();

    for number in [0, 6, 99] {
        let err = message.field(pid, number).unwrap_err();
        assert!(matches!(err, Hl7ModelError::SchemaViolation { .. }));
        let err = message.field_reps(pid, number).unwrap_err();
        assert!(matches!(err, Hl7ModelError::SchemaViolation { .. }));
    }
}

#[test]
fn component_index_beyond_schema_is_schema_violation() {
    let mut message = build_message();
    let root = message.root();
    let patient = message.get_or_create(root, "PATIENT").unwrap();
    let pid = message.get_or_create(patient, "PID").unwrap();
    let cx = message.field(pid, 3).unwrap();

    assert_eq!(message.component_count(cx).unwrap(), 5);
    assert!(message.component(cx, 4).is_ok());
    let err = message.component(cx, 5).unwrap_err();
    assert!(matches!(err, Hl7ModelError::SchemaViolation { .. }));
    let err = message.component(cx, 99).unwrap_err();
    assert!(matches!(err, Hl7ModelError::SchemaViolation { .. }));
}

#[test]
fn components_materialize_with_their_composite() {
    let mut message = build_message();
    let root = message.root();
    let patient = message.get_or_create(root, "PATIENT").unwrap();
    let pid = message.get_or_create(patient, "PID").unwrap();
    let cx = message.field(pid, 3).unwrap();

    // CX-4 is itself a composite (HD) whose components exist too.
    let authority = message.component(cx, 3).unwrap();
    assert_eq!(message.kind(authority), NodeKind::Composite);
    assert_eq!(message.type_name(authority), "HD");
    let namespace = message.component(authority, 0).unwrap();
    assert_eq!(message.kind(namespace), NodeKind::Primitive);
    assert_eq!(message.value(namespace).unwrap(), "");
}

#[test]
fn coded_tables_bind_at_the_use_site() {
    let mut message = build_message();
    let root = message.root();
    let patient = message.get_or_create(root, "PATIENT").unwrap();
    let pid = message.get_or_create(patient, "PID").unwrap();
    let cx = message.field(pid, 3).unwrap();

    let scheme = message.component(cx, 2).unwrap();
    assert_eq!(message.coded_table(scheme), Some(61));
    let id_number = message.component(cx, 0).unwrap();
    assert_eq!(message.coded_table(id_number), None);
}

#[test]
fn values_live_on_primitives_only() {
    let mut message = build_message();
    let root = message.root();
    let patient = message.get_or_create(root, "PATIENT").unwrap();
    let pid = message.get_or_create(patient, "PID").unwrap();

    let set_id = message.field(pid, 1).unwrap();
    message.set_value(set_id, "1").unwrap();
    assert_eq!(message.value(set_id).unwrap(), "1");

    let cx = message.field(pid, 3).unwrap();
    assert!(matches!(
        message.value(cx).unwrap_err(),
        Hl7ModelError::SchemaViolation { .. }
    ));
    assert!(matches!(
        message.set_value(cx, "x").unwrap_err(),
        Hl7ModelError::SchemaViolation { .. }
    ));
}

#[test]
fn truncating_writes_honor_field_max_length() {
    let mut message = build_message();
    let root = message.root();
    let patient = message.get_or_create(root, "PATIENT").unwrap();
    let pid = message.get_or_create(patient, "PID").unwrap();

    // PID-5 (Birth Place) caps at 10 characters.
    let birth_place = message.field(pid, 5).unwrap();
    message
        .set_value_truncating(birth_place, "Springfield General Hospital")
        .unwrap();
    assert_eq!(message.value(birth_place).unwrap(), "Springfiel");

    // Unbounded sites pass values through.
    let nte = message.get_or_create(patient, "NTE").unwrap();
    let comment = message.field(nte, 3).unwrap();
    message.set_value_truncating(comment, "no limit applies here").unwrap();
    assert_eq!(message.value(comment).unwrap(), "no limit applies here");
}

#[test]
fn parent_links_point_up_the_tree() {
    let mut message = build_message();
    let root = message.root();

    assert_eq!(message.parent(root), None);
    let patient = message.get_or_create(root, "PATIENT").unwrap();
    assert_eq!(message.parent(patient), Some(root));
    let pid = message.get_or_create(patient, "PID").unwrap();
    assert_eq!(message.parent(pid), Some(patient));
    let cx = message.field(pid, 3).unwrap();
    assert_eq!(message.parent(cx), Some(pid));
}

#[test]
fn walk_yields_document_order() {
    let mut message = build_message();
    let root = message.root();
    let patient = message.get_or_create(root, "PATIENT").unwrap();
    message.get_or_create(patient, "PID").unwrap();
    let order_obs = message.get_or_create(root, "ORDER_OBSERVATION").unwrap();
    let observation = message.get_or_create(order_obs, "OBSERVATION").unwrap();
    message.get_or_create(observation, "OBX").unwrap();

    let segments: Vec<&str> = message
        .segments()
        .map(|node| message.type_name(node))
        .collect();
    assert_eq!(segments, vec!["MSH", "PID", "OBX"]);

    // Pre-order: the root comes first and every node follows its parent.
    let order: Vec<NodeId> = message.walk().collect();
    assert_eq!(order[0], root);
    for (position, &node) in order.iter().enumerate() {
        if let Some(parent) = message.parent(node) {
            let parent_pos = order.iter().position(|&n| n == parent).unwrap();
            assert!(parent_pos < position);
        }
    }
}

#[test]
fn find_segment_counts_in_document_order() {
    let mut message = build_message();
    let root = message.root();
    let patient = message.get_or_create(root, "PATIENT").unwrap();
    let first = message.get_or_create_rep(patient, "NTE", 0).unwrap();
    let order = message.get_or_create(root, "ORDER_OBSERVATION").unwrap();
    let observation = message.get_or_create(order, "OBSERVATION").unwrap();
    let second = message.get_or_create(observation, "NTE").unwrap();

    assert_eq!(message.find_segment("NTE", 0), Some(first));
    assert_eq!(message.find_segment("NTE", 1), Some(second));
    assert_eq!(message.find_segment("NTE", 2), None);
    assert_eq!(message.find_segment("ZZZ", 0), None);
}

#[test]
fn message_metadata_comes_from_the_schema() {
    let message = build_message();
    assert_eq!(message.message_type(), "ORU_R01");
    assert_eq!(message.version(), "2.5.1");
    assert_eq!(message.kind(message.root()), NodeKind::Group);
    assert_eq!(message.type_name(message.root()), "ORU_R01");
}
