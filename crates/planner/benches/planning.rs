use criterion::{BenchmarkId, Criterion, black_box, criterion_group, criterion_main};

use prodplan_core::{MaterialId, ProductId};
use prodplan_planner::{CatalogSnapshot, Product, RawMaterial, plan_production};

fn snapshot(products: u64, materials: u64, recipe_len: u64) -> CatalogSnapshot {
    let materials_list = (0..materials)
        .map(|i| RawMaterial::new(MaterialId::new(i), format!("M{i}"), 10_000 + (i as i64 * 37) % 500))
        .collect();
    let products_list = (0..products)
        .map(|p| {
            let mut product =
                Product::new(ProductId::new(p), format!("P{p}"), ((p * 13) % 97) as f64 + 0.5);
            for k in 0..recipe_len {
                let material = (p * 7 + k * 11) % materials;
                if product.recipe.iter().all(|item| item.material_id.get() != material) {
                    product = product.with_item(MaterialId::new(material), 1 + ((p + k) % 9) as i64);
                }
            }
            product
        })
        .collect();
    CatalogSnapshot::new(products_list, materials_list)
}

fn bench_plan_production(c: &mut Criterion) {
    let mut group = c.benchmark_group("plan_production");
    for products in [10u64, 100, 1_000] {
        let input = snapshot(products, 50, 5);
        group.bench_with_input(BenchmarkId::from_parameter(products), &input, |b, input| {
            b.iter(|| plan_production(black_box(input)))
        });
    }
    group.finish();
}

criterion_group!(benches, bench_plan_production);
criterion_main!(benches);
