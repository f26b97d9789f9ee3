use crate::catalog::Catalog;

pub fn cmd_operations(args: &[String]) -> Result<String, String> {
    if !args.is_empty() {
        return Err("usage: operations".to_string());
    }
    let mut lines = Vec::new();
    for group in Catalog::builtin().groups() {
        lines.push(group.category.to_string());
        for operation in group.operations {
            lines.push(format!(
                "  {:<18} {:<18} {}",
                operation.id, operation.name, operation.description
            ));
        }
    }
    Ok(lines.join("\n"))
}
