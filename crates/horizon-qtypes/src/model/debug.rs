//! Tree debug output for models.

use horizon_qtypes_core::DebugTree;

use super::node::{Kind, Model};

impl DebugTree for Model {
    fn debug_name(&self) -> String {
        self.name().to_string()
    }

    fn debug_kind(&self) -> &'static str {
        self.qtype().as_str()
    }

    fn debug_value(&self) -> Option<String> {
        match self.kind() {
            Kind::Bool(value) => Some(value.read().to_string()),
            Kind::Number(_) => self.as_number().map(|number| {
                let quantity = number.quantity();
                match quantity.units {
                    Some(units) => format!("{} {units}", quantity.value),
                    None => quantity.value.to_string(),
                }
            }),
            Kind::Enum(_) => self.as_enum().map(|e| format!("{:?}", e.read())),
            Kind::String(value) => Some(format!("{:?}", value.read())),
            Kind::Button | Kind::Null => None,
        }
    }

    fn debug_children(&self) -> Vec<Self> {
        self.children()
    }
}

impl Model {
    /// Render this subtree with the default tree format.
    pub fn debug_tree(&self) -> String {
        horizon_qtypes_core::TreeDebug::new().format(self)
    }
}

#[cfg(test)]
mod tests {
    use crate::model::{Bool, Null, Number, Text};
    use horizon_qtypes_core::{TreeDebug, TreeFormatOptions, TreeStyle};

    #[test]
    fn test_model_tree_output() {
        let root = Null::new("root");
        root.append_child(Number::builder("delay").value(1.5).units("ps").build().unwrap())
            .unwrap();
        root.append_child(Bool::new("shutter", true)).unwrap();
        root.append_child(Text::new("comment", "hi")).unwrap();

        let output = TreeDebug::with_options(TreeFormatOptions {
            style: TreeStyle::Ascii,
            ..Default::default()
        })
        .format(root.model());

        assert_eq!(
            output,
            "root (null)\n\
             +-- delay (number) = 1.5 ps\n\
             +-- shutter (bool) = true\n\
             `-- comment (string) = \"hi\"\n"
        );
        assert!(root.debug_tree().starts_with("root (null)\n"));
    }
}
