//! Plain-text rendering for terminal output.

use std::io::{self, Write};

use prodplan_planner::{Product, ProductionPlanResult, RawMaterial};

pub fn plan(out: &mut impl Write, plan: &ProductionPlanResult, committed: bool) -> io::Result<()> {
    if plan.is_empty() {
        writeln!(out, "Nothing can be produced with the current stock.")?;
        return Ok(());
    }

    writeln!(out, "Production plan")?;
    for s in &plan.suggestions {
        writeln!(
            out,
            "  {:<24} {:>8} {:<5} {:>12.2}",
            s.product_name,
            s.quantity,
            if s.quantity == 1 { "unit" } else { "units" },
            s.total_value
        )?;
    }

    writeln!(out, "Material usage")?;
    for u in &plan.material_usage {
        writeln!(
            out,
            "  {:<24} used {:>8}  remaining {:>8}",
            u.material_name, u.quantity_used, u.remaining_stock
        )?;
    }

    let summary = plan.summary();
    writeln!(
        out,
        "Total revenue: {:.2} ({} products, {} units)",
        summary.total_revenue, summary.product_count, summary.total_quantity
    )?;
    if committed {
        writeln!(out, "Material usage committed to the catalog.")?;
    }
    Ok(())
}

pub fn materials(out: &mut impl Write, materials: &[RawMaterial]) -> io::Result<()> {
    if materials.is_empty() {
        writeln!(out, "No raw materials in catalog.")?;
        return Ok(());
    }
    for m in materials {
        writeln!(out, "  {:>4}  {:<24} {:>10}", m.id, m.name, m.stock_quantity)?;
    }
    Ok(())
}

pub fn products(out: &mut impl Write, products: &[Product], materials: &[RawMaterial]) -> io::Result<()> {
    if products.is_empty() {
        writeln!(out, "No products in catalog.")?;
        return Ok(());
    }
    for p in products {
        writeln!(out, "  {:>4}  {:<24} {:>12.2}", p.id, p.name, p.unit_value)?;
        if !p.has_recipe() {
            writeln!(out, "        (no recipe)")?;
        }
        for item in &p.recipe {
            let name = materials
                .iter()
                .find(|m| m.id == item.material_id)
                .map_or("?", |m| m.name.as_str());
            writeln!(out, "        {} x {}", item.required_quantity, name)?;
        }
    }
    Ok(())
}
