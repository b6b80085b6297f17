use crate::project::NodeKind;

pub struct StructuredLabel {
    pub primary: String,
    pub extension: Option<String>,
    pub secondary: Option<String>,
}

/// Splits a raw node label into the pieces the canvas renders separately:
/// file labels become stem + extension (+ anchor suffix), import-like labels
/// become head + breadcrumb tail.
pub fn structured_label(label: &str, kind: NodeKind) -> StructuredLabel {
    let normalized = label.trim();

    if kind == NodeKind::File {
        let tail = normalized
            .rsplit(['/', '\\'])
            .next()
            .unwrap_or(normalized);
        let (file_name, anchor) = match tail.split_once('#') {
            Some((name, anchor)) => (name, Some(format!("#{anchor}"))),
            None => (tail, None),
        };

        if let Some(dot) = file_name.rfind('.')
            && dot > 0
            && dot < file_name.len() - 1
        {
            return StructuredLabel {
                primary: file_name[..dot].to_string(),
                extension: Some(file_name[dot + 1..].to_string()),
                secondary: anchor,
            };
        }

        return StructuredLabel {
            primary: if file_name.is_empty() {
                tail.to_string()
            } else {
                file_name.to_string()
            },
            extension: None,
            secondary: anchor,
        };
    }

    let segments = normalized
        .split(':')
        .filter(|segment| !segment.is_empty())
        .collect::<Vec<_>>();

    if segments.len() < 2 {
        return StructuredLabel {
            primary: normalized.to_string(),
            extension: None,
            secondary: None,
        };
    }

    StructuredLabel {
        primary: segments[0].to_string(),
        extension: None,
        secondary: Some(segments[1..].join(" › ")),
    }
}
