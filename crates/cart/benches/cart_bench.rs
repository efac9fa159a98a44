use cart::{
    CartService, CartState, InMemoryCartStore, InMemoryCatalog, InMemoryNotificationSink, Money,
    Product, ProductId, UpdateItemAmount,
};
use criterion::{Criterion, criterion_group, criterion_main};

type BenchService = CartService<InMemoryCatalog, InMemoryCartStore, InMemoryNotificationSink>;

fn catalog_with(products: u64, stock: u32) -> InMemoryCatalog {
    let catalog = InMemoryCatalog::new();
    for n in 1..=products {
        catalog.add_product(
            Product::new(
                ProductId::new(n),
                format!("Sneaker {n}"),
                Money::from_cents(17990),
                format!("{n}.jpg"),
            ),
            stock,
        );
    }
    catalog
}

fn new_service(catalog: InMemoryCatalog) -> BenchService {
    CartService::new(
        catalog,
        InMemoryCartStore::new(),
        InMemoryNotificationSink::new(),
    )
}

fn bench_add_new_item(c: &mut Criterion) {
    let rt = tokio::runtime::Runtime::new().unwrap();
    let catalog = catalog_with(1, 10);

    c.bench_function("cart/add_new_item", |b| {
        b.iter(|| {
            rt.block_on(async {
                let service = new_service(catalog.clone());
                service.add_item(ProductId::new(1)).await.unwrap();
            });
        });
    });
}

fn bench_set_amount_in_large_cart(c: &mut Criterion) {
    let rt = tokio::runtime::Runtime::new().unwrap();
    let catalog = catalog_with(100, u32::MAX);
    let service = new_service(catalog);
    rt.block_on(async {
        for n in 1..=100 {
            service.add_item(ProductId::new(n)).await.unwrap();
        }
    });

    let mut amount = 1;
    c.bench_function("cart/set_amount_100_items", |b| {
        b.iter(|| {
            amount += 1;
            rt.block_on(async {
                service
                    .set_item_amount(UpdateItemAmount::new(ProductId::new(50), amount))
                    .await
                    .unwrap();
            });
        });
    });
}

fn bench_document_roundtrip(c: &mut Criterion) {
    let rt = tokio::runtime::Runtime::new().unwrap();
    let service = new_service(catalog_with(50, 10));
    let cart = rt.block_on(async {
        for n in 1..=50 {
            service.add_item(ProductId::new(n)).await.unwrap();
        }
        service.cart().await
    });

    c.bench_function("cart/document_roundtrip_50_items", |b| {
        b.iter(|| {
            let json = cart.to_json().unwrap();
            CartState::from_json(&json).unwrap()
        });
    });
}

criterion_group!(
    benches,
    bench_add_new_item,
    bench_set_amount_in_large_cart,
    bench_document_roundtrip
);
criterion_main!(benches);
