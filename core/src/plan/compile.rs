//! plan/compile.rs
//!
//! Packing plan compiler.
//!
//! Design notes:
//! - Each field is classified into exactly one `Shape`.
//! - Consecutive fields of the same class (fixed / dynamic) merge into one
//!   `Segment`; a class change starts a new one.
//! - A fixed segment is packed and unpacked as one contiguous block.

use tracing::debug;

use crate::plan::types::{DynamicRun, FieldPlan, FixedRun, Segment, Shape};
use crate::schema::Schema;

/// Compile `schema` into its segment list.
pub fn compile(schema: &Schema) -> Vec<Segment> {
    let marker = schema.order().marker();

    let segments = schema
        .fields()
        .iter()
        .enumerate()
        .map(|(index, field)| FieldPlan {
            index,
            id: field.id().to_string(),
            shape: Shape::of(field),
        })
        .fold(Vec::<Segment>::new(), |mut segments, plan| {
            match (segments.last_mut(), plan.shape.fixed_width()) {
                (Some(Segment::Fixed(run)), Some(width)) => {
                    run.width += width;
                    push_format(&mut run.format, &plan.shape);
                    run.fields.push(plan);
                }
                (Some(Segment::Dynamic(run)), None) => run.fields.push(plan),
                (_, Some(width)) => {
                    let mut format = marker.to_string();
                    push_format(&mut format, &plan.shape);
                    segments.push(Segment::Fixed(FixedRun {
                        fields: vec![plan],
                        format,
                        width,
                    }));
                }
                (_, None) => segments.push(Segment::Dynamic(DynamicRun { fields: vec![plan] })),
            }
            segments
        });

    debug!(
        "[PLAN] compiled {} field(s) into {} segment(s)",
        schema.len(),
        segments.len()
    );
    segments
}

fn push_format(format: &mut String, shape: &Shape) {
    if let Some(token) = shape.format_token() {
        format.push_str(&token);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn adjacent_fixed_fields_share_one_format() {
        let schema = Schema::parse("<H(a)B(b)3s(c)2:I(d)").unwrap();
        let segments = compile(&schema);
        assert_eq!(segments.len(), 1);
        match &segments[0] {
            Segment::Fixed(run) => {
                assert_eq!(run.format, "<HB3s2I");
                assert_eq!(run.width, 2 + 1 + 3 + 8);
            }
            other => panic!("unexpected segment: {}", other),
        }
    }
}
