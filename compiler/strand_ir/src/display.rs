//! Textual rendering of instructions for logs and test failure messages.
//!
//! Format: `defs = opcode [details] uses [throws types]`, e.g.
//! `v3 = binary_op div v1, v2 throws [Primordial:ArithmeticException]`.

use crate::{FieldRef, Instr, InstrKind, StringLookup, ValueId};

fn join(values: &[ValueId]) -> String {
    values
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

fn field(names: &impl StringLookup, field: FieldRef) -> String {
    format!(
        "{}.{}",
        field.declaring.display(names),
        names.lookup(field.name)
    )
}

impl Instr {
    /// Render this instruction with names resolved through `names`.
    pub fn display(&self, names: &impl StringLookup) -> String {
        let mut out = String::new();

        let defs = self.defs();
        if !defs.is_empty() {
            out.push_str(&join(&defs));
            out.push_str(" = ");
        }
        out.push_str(self.opcode().name());

        if let Some(details) = self.details(names) {
            out.push(' ');
            out.push_str(&details);
        }

        let uses = self.uses();
        if !uses.is_empty() {
            out.push(' ');
            out.push_str(&join(&uses));
        }

        if let Ok(types) = self.exception_types() {
            let types: Vec<_> = types.iter().map(|t| t.display(names)).collect();
            out.push_str(" throws [");
            out.push_str(&types.join(", "));
            out.push(']');
        }
        out
    }

    /// Non-operand payload, where the variant has any.
    fn details(&self, names: &impl StringLookup) -> Option<String> {
        let details = match self.kind() {
            InstrKind::Pi {
                block,
                successor,
                cause,
                ..
            } => format!("{block}->{successor} @{}", cause.raw()),
            InstrKind::Get { field: f, .. } | InstrKind::Put { field: f, .. } => field(names, *f),
            InstrKind::GlobalRead { global, .. } | InstrKind::GlobalWrite { global, .. } => {
                field(names, *global)
            }
            InstrKind::ConditionalBranch {
                op, operand_type, ..
            } => format!("{op} {}", operand_type.display(names)),
            InstrKind::Switch { default, cases, .. } => {
                let mut labels: Vec<_> = cases
                    .iter()
                    .map(|(value, label)| format!("{value}: {label}"))
                    .collect();
                labels.push(format!("default: {default}"));
                format!("[{}]", labels.join(", "))
            }
            InstrKind::GetCaughtException { block, .. } => block.to_string(),
            InstrKind::Invoke { site, .. } => format!(
                "{}.{}",
                site.target.declaring.display(names),
                names.lookup(site.target.selector)
            ),
            InstrKind::New { site, .. } => site.ty.display(names),
            InstrKind::UnaryOp { op, .. } => op.to_string(),
            InstrKind::BinaryOp { op, .. } => op.to_string(),
            InstrKind::Comparison { op, .. } => op.to_string(),
            InstrKind::InstanceOf { ty, .. } | InstrKind::CheckCast { ty, .. } => {
                ty.display(names)
            }
            InstrKind::Conversion {
                from,
                to,
                check_overflow,
                ..
            } => format!(
                "{} -> {}{}",
                from.display(names),
                to.display(names),
                if *check_overflow { " checked" } else { "" }
            ),
            InstrKind::ArrayLoad { element, .. } | InstrKind::ArrayStore { element, .. } => {
                element.display(names)
            }
            InstrKind::Monitor { enter, .. } | InstrKind::ScopedRegion { enter, .. } => {
                (if *enter { "enter" } else { "exit" }).to_owned()
            }
            InstrKind::LoadMetadata { entity, token, .. } => {
                format!("{} {}", entity.display(names), token.display(names))
            }
            InstrKind::LexicalRead { accesses } | InstrKind::LexicalWrite { accesses } => {
                let accesses: Vec<_> = accesses
                    .iter()
                    .map(|a| {
                        format!("{}::{}", names.lookup(a.definer), names.lookup(a.variable))
                    })
                    .collect();
                format!("[{}]", accesses.join(", "))
            }
            InstrKind::IsDefined { field: Some(f), .. } => field(names, *f),
            InstrKind::Assert {
                from_specification: true,
                ..
            } => "specification".to_owned(),
            _ => return None,
        };
        Some(details)
    }
}
