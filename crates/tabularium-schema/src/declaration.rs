//! Human-readable record-type declarations.
//!
//! Rendering only: the output documents a synthesized type for maintainers
//! and the dataset detail page, and is never parsed back.

use crate::record_type::{RecordType, SEARCH_VECTOR_COLUMN};
use tabularium_commons::types::FieldType;

fn type_display_name(field_type: FieldType) -> &'static str {
    match field_type {
        FieldType::Binary => "Binary",
        FieldType::Bool => "Bool",
        FieldType::Date => "Date",
        FieldType::DateTime => "DateTime",
        FieldType::Decimal => "Decimal",
        FieldType::Email => "Email",
        FieldType::Float => "Float",
        FieldType::Integer => "Integer",
        FieldType::Json => "Json",
        FieldType::String => "String",
        FieldType::Text => "Text",
    }
}

/// Render a source-like declaration of the synthesized type: one field
/// assignment per line, the nested index list, and the trailing ordering
/// tuple.
pub fn render_declaration(record_type: &RecordType) -> String {
    let mut lines = Vec::new();
    lines.push(format!("record {} {{", record_type.type_name));

    for attribute in &record_type.attributes {
        let mut args = vec![format!("null={}", attribute.nullable)];
        if let Some(n) = attribute.options.max_length {
            args.push(format!("max_length={}", n));
        }
        if let Some(n) = attribute.options.max_digits {
            args.push(format!("max_digits={}", n));
        }
        if let Some(n) = attribute.options.decimal_places {
            args.push(format!("decimal_places={}", n));
        }
        lines.push(format!(
            "    {} = {}({})",
            attribute.name,
            type_display_name(attribute.field_type),
            args.join(", ")
        ));
    }
    lines.push(format!(
        "    {} = SearchVector(null=true)",
        SEARCH_VECTOR_COLUMN
    ));

    lines.push(String::new());
    lines.push("    indexes = [".to_string());
    for index in &record_type.indexes {
        let fields = index
            .fields
            .iter()
            .map(|f| format!("'{}'", f))
            .collect::<Vec<_>>()
            .join(", ");
        lines.push(format!(
            "        {:?}(name='{}', fields=[{}]),",
            index.kind, index.name, fields
        ));
    }
    lines.push("    ]".to_string());

    let ordering = record_type
        .ordering
        .iter()
        .map(|f| format!("'{}'", f))
        .collect::<Vec<_>>()
        .join(", ");
    lines.push(format!("    ordering = [{}]", ordering));
    lines.push("}".to_string());

    lines.join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record_type::tests::{sample_fields, sample_table};
    use crate::record_type::synthesize;
    use tabularium_commons::models::Slug;

    #[test]
    fn test_declaration_shape() {
        let slug = Slug::new("socios-brasil");
        let record_type = synthesize(&slug, &sample_table(), &sample_fields()).unwrap();
        let declaration = render_declaration(&record_type);

        assert!(declaration.starts_with("record SociosBrasilEmpresaSocios {"));
        assert!(declaration.contains("    name = String(null=true)"));
        assert!(declaration.contains("    age = Integer(null=true)"));
        assert!(declaration.contains("    search_data = SearchVector(null=true)"));
        assert!(declaration.contains("    indexes = ["));
        assert!(declaration.contains("    ordering = ['name']"));
        assert!(declaration.ends_with("}"));
    }

    #[test]
    fn test_declaration_lists_options() {
        let slug = Slug::new("socios-brasil");
        let mut fields = sample_fields();
        fields[1].options = Some(serde_json::json!({"max_length": 127}));
        let record_type = synthesize(&slug, &sample_table(), &fields).unwrap();
        let declaration = render_declaration(&record_type);

        assert!(declaration.contains("name = String(null=true, max_length=127)"));
    }

    #[test]
    fn test_declaration_one_line_per_index() {
        let slug = Slug::new("socios-brasil");
        let record_type = synthesize(&slug, &sample_table(), &sample_fields()).unwrap();
        let declaration = render_declaration(&record_type);

        let index_lines = declaration
            .lines()
            .filter(|line| line.trim_start().starts_with("BTree(") || line.trim_start().starts_with("Gin("))
            .count();
        assert_eq!(index_lines, record_type.indexes.len());
    }
}
