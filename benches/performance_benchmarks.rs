use aquatrack::models::{ActivityLevel, TimeOfDay, WaterDayRecord};
use aquatrack::{goal, reminder, stats};
use chrono::NaiveDate;
use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};

/// Benchmarks for the calculators behind every screen refresh

fn bench_goal_calculation(c: &mut Criterion) {
    c.bench_function("recommended_intake", |b| {
        b.iter(|| {
            for level in ActivityLevel::ALL {
                black_box(goal::GoalCalculator::recommended_intake(black_box(72.5), level));
            }
        });
    });
}

fn bench_reminder_slots(c: &mut Criterion) {
    let mut group = c.benchmark_group("Reminder Slots");
    let start = TimeOfDay::from_hm(0, 0).unwrap();
    let end = TimeOfDay::from_hm(23, 59).unwrap();

    for &frequency in &[1u32, 15, 60, 240] {
        group.bench_with_input(
            BenchmarkId::new("slots_between", frequency),
            &frequency,
            |b, &frequency| {
                b.iter(|| reminder::ReminderScheduler::slots_between(start, end, frequency));
            },
        );
    }

    group.finish();
}

fn bench_next_reminder(c: &mut Criterion) {
    let date = NaiveDate::from_ymd_opt(2024, 1, 15).unwrap();
    let times: Vec<_> = (0..1440u32)
        .map(|m| date.and_hms_opt(m / 60, m % 60, 0).unwrap())
        .collect();

    c.bench_function("next_reminder_full_day", |b| {
        b.iter(|| {
            for now in &times {
                black_box(reminder::ReminderScheduler::next_reminder(
                    *now, 60, "8:00", "22:00",
                ));
            }
        });
    });
}

fn bench_month_stats(c: &mut Criterion) {
    let mut group = c.benchmark_group("Month Stats");

    for &days in &[7usize, 31, 366] {
        let start = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
        let records: Vec<WaterDayRecord> = start
            .iter_days()
            .take(days)
            .enumerate()
            .map(|(i, date)| WaterDayRecord {
                date,
                intake_ml: 1500 + (i as u32 * 37) % 1200,
                goal_ml: 2000,
            })
            .collect();

        group.throughput(Throughput::Elements(days as u64));
        group.bench_with_input(BenchmarkId::new("from_records", days), &records, |b, records| {
            b.iter(|| stats::MonthStats::from_records(records));
        });
    }

    group.finish();
}

criterion_group!(
    benches,
    bench_goal_calculation,
    bench_reminder_slots,
    bench_next_reminder,
    bench_month_stats
);
criterion_main!(benches);
