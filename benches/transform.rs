use chrono::{Days, NaiveDate};
use criterion::{black_box, criterion_group, criterion_main, Criterion};
use forecast_csv::{transform, weather_rows_to_frame, write_outlook, WeatherRow};
use tokio::runtime::Runtime;

fn rows(days: u64) -> Vec<WeatherRow> {
    let start = NaiveDate::from_ymd_opt(2024, 6, 11).unwrap();
    (0..days)
        .map(|i| WeatherRow {
            date: start.checked_add_days(Days::new(i)).unwrap().to_string(),
            tavg: Some(18.0 + (i % 5) as f64),
            tmin: Some(12.0),
            tmax: Some(24.0 + (i % 9) as f64),
            prcp: if i % 3 == 0 { None } else { Some((i % 4) as f64 * 0.5) },
        })
        .collect()
}

fn bench_transform(c: &mut Criterion) {
    let week = weather_rows_to_frame(&rows(7)).unwrap();
    let year = weather_rows_to_frame(&rows(365)).unwrap();

    c.bench_function("transform_week", |b| {
        b.iter(|| transform(black_box(week.clone()), 30.0))
    });
    c.bench_function("transform_year", |b| {
        b.iter(|| transform(black_box(year.clone()), 30.0))
    });
}

fn bench_write(c: &mut Criterion) {
    let runtime = Runtime::new().unwrap();
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("week.csv");
    let outlook = transform(weather_rows_to_frame(&rows(7)).unwrap(), 30.0).unwrap();

    c.bench_function("write_week_csv", |b| {
        b.to_async(&runtime)
            .iter(|| write_outlook(black_box(&path), black_box(&outlook)))
    });
}

criterion_group!(benches, bench_transform, bench_write);
criterion_main!(benches);
