use octofhir_hl7v2::*;
use std::sync::Arc;

/// A cut-down ORU_R01 catalog: enough of the real structure to exercise
/// every cardinality combination without carrying full segment tables.
#[allow(dead_code)]
pub fn build_registry() -> SchemaRegistry {
    let mut registry = SchemaRegistry::new("2.5.1");

    registry.register_primitive(PrimitiveSchema::new("ST"));
    registry.register_primitive(PrimitiveSchema::new("ID"));
    registry.register_primitive(PrimitiveSchema::new("SI"));
    registry.register_primitive(PrimitiveSchema::new("NM"));

    registry.register_composite(
        CompositeSchema::new("HD")
            .with_component(ComponentDescriptor::new("Namespace ID", "ST").with_table(300))
            .with_component(ComponentDescriptor::new("Universal ID", "ST"))
            .with_component(ComponentDescriptor::new("Universal ID Type", "ID").with_table(301)),
    );
    registry.register_composite(
        CompositeSchema::new("CX")
            .with_component(ComponentDescriptor::new("ID Number", "ST"))
            .with_component(ComponentDescriptor::new("Check Digit", "ST"))
            .with_component(ComponentDescriptor::new("Check Digit Scheme", "ID").with_table(61))
            .with_component(ComponentDescriptor::new("Assigning Authority", "HD"))
            .with_component(ComponentDescriptor::new("Identifier Type Code", "ID").with_table(203)),
    );
    registry.register_composite(
        CompositeSchema::new("XPN")
            .with_component(ComponentDescriptor::new("Family Name", "ST"))
            .with_component(ComponentDescriptor::new("Given Name", "ST"))
            .with_component(ComponentDescriptor::new("Name Type Code", "ID").with_table(200)),
    );
    registry.register_composite(
        CompositeSchema::new("CWE")
            .with_component(ComponentDescriptor::new("Identifier", "ST"))
            .with_component(ComponentDescriptor::new("Text", "ST"))
            .with_component(ComponentDescriptor::new("Name of Coding System", "ID").with_table(396)),
    );

    registry.register_segment(
        SegmentSchema::new("MSH")
            .with_description("Message Header")
            .with_field(FieldDescriptor::new("Field Separator", "ST").required().with_max_length(1))
            .with_field(FieldDescriptor::new("Encoding Characters", "ST").required().with_max_length(4))
            .with_field(FieldDescriptor::new("Sending Application", "HD"))
            .with_field(FieldDescriptor::new("Message Control ID", "ST").required().with_max_length(20)),
    );
    registry.register_segment(
        SegmentSchema::new("PID")
            .with_description("Patient Identification")
            .with_field(FieldDescriptor::new("Set ID - PID", "SI").required().with_max_length(4))
            .with_field(FieldDescriptor::new("Race", "CWE").repeating())
            .with_field(FieldDescriptor::new("Patient Identifier List", "CX").required().repeating())
            .with_field(FieldDescriptor::new("Patient Name", "XPN").required().repeating())
            .with_field(FieldDescriptor::new("Birth Place", "ST").with_max_length(10)),
    );
    registry.register_segment(
        SegmentSchema::new("OBX")
            .with_description("Observation/Result")
            .with_field(FieldDescriptor::new("Set ID - OBX", "SI"))
            .with_field(FieldDescriptor::new("Value Type", "ID").with_table(125))
            .with_field(FieldDescriptor::new("Observation Identifier", "CWE").required())
            .with_field(FieldDescriptor::new("Observation Value", "ST").repeating()),
    );
    registry.register_segment(
        SegmentSchema::new("NTE")
            .with_description("Notes and Comments")
            .with_field(FieldDescriptor::new("Set ID - NTE", "SI"))
            .with_field(FieldDescriptor::new("Source of Comment", "ID").with_table(105))
            .with_field(FieldDescriptor::new("Comment", "ST").repeating()),
    );

    registry.register_group(
        GroupSchema::new("ORU_R01_PATIENT")
            .with_slot(SlotDescriptor::of("PID").required())
            .with_slot(SlotDescriptor::of("NTE").repeating()),
    );
    registry.register_group(
        GroupSchema::new("ORU_R01_OBSERVATION")
            .with_slot(SlotDescriptor::of("OBX").required())
            .with_slot(SlotDescriptor::of("NTE").repeating()),
    );
    registry.register_group(
        GroupSchema::new("ORU_R01_ORDER_OBSERVATION").with_slot(
            SlotDescriptor::new("OBSERVATION", "ORU_R01_OBSERVATION").repeating(),
        ),
    );
    registry.register_group(
        GroupSchema::new("ORU_R01")
            .with_slot(SlotDescriptor::of("MSH").required())
            .with_slot(SlotDescriptor::new("PATIENT", "ORU_R01_PATIENT"))
            .with_slot(
                SlotDescriptor::new("ORDER_OBSERVATION", "ORU_R01_ORDER_OBSERVATION")
                    .required()
                    .repeating(),
            ),
    );

    registry.register_message(
        MessageSchema::new("ORU_R01", "2.5.1", "ORU_R01")
            .with_description("Unsolicited observation result"),
    );

    registry
}

#[allow(dead_code)]
pub fn build_message() -> Message {
    Message::new(Arc::new(build_registry()), "ORU_R01").unwrap()
}
