use codspeed_criterion_compat::{Criterion, criterion_group, criterion_main};
use lmi7702::prelude::*;

fn flat_charges(n: usize) -> GptVectorParms {
    GptVectorParms::builder()
        .prem_load_target(vec![0.06; n])
        .prem_load_excess(vec![0.02; n])
        .policy_fee_monthly(vec![5.0; n])
        .policy_fee_annual(vec![0.0; n])
        .specamt_load_monthly(vec![0.0002; n])
        .qab_gio_rate(vec![0.0; n])
        .qab_adb_rate(vec![0.0; n])
        .qab_term_rate(vec![0.0; n])
        .qab_spouse_rate(vec![0.0; n])
        .qab_child_rate(vec![0.0; n])
        .qab_waiver_rate(vec![0.0; n])
        .build()
}

fn triad(n: usize) -> GptCfTriad {
    let qc = vec![0.0012; n];
    let ic = vec![0.005; n];
    let ig = vec![0.0033; n];
    GptCfTriad::new(&qc, &ic, &ig, &ic, &ig, &flat_charges(n)).unwrap()
}

fn parms(duration: u32, specamt: f64) -> GptScalarParms {
    GptScalarParms::builder()
        .duration(duration)
        .f3_bft(specamt)
        .endt_bft(specamt)
        .target_prem(10_000.0)
        .chg_sa_base(specamt)
        .dbopt_7702(DbOpt::Option1)
        .qab_gio_amt(0.0)
        .qab_adb_amt(0.0)
        .qab_term_amt(0.0)
        .qab_spouse_amt(0.0)
        .qab_child_amt(0.0)
        .qab_waiver_amt(0.0)
        .build()
}

fn bench_initialize_gpt(c: &mut Criterion) {
    c.bench_function("initialize_gpt_at_issue", |b| {
        b.iter(|| {
            GptEngine::initialize_gpt(
                triad(50),
                DefnLifeIns::Gpt,
                0.0,
                0.0,
                0.0,
                0.0,
                0.0,
                parms(0, 1_000_000.0),
            )
            .unwrap()
        });
    });
}

fn bench_accept_payment(c: &mut Criterion) {
    c.bench_function("accept_payment_within_limit", |b| {
        b.iter(|| {
            let mut engine = GptEngine::initialize_gpt(
                triad(50),
                DefnLifeIns::Gpt,
                0.0,
                0.0,
                0.0,
                0.0,
                0.0,
                parms(0, 1_000_000.0),
            )
            .unwrap();
            engine.accept_payment(5_000.0).unwrap()
        });
    });
}

fn bench_specamt_inversion(c: &mut Criterion) {
    let t = triad(50);
    let target_premium = t
        .calculate_premium(GlpOrGsp::Glp, &parms(0, 1_000_000.0))
        .unwrap();

    c.bench_function("calculate_glp_spec_amt", |b| {
        b.iter(|| {
            calculate_glp_spec_amt(&t, parms(0, 1_000_000.0), target_premium, 10_000.0).unwrap()
        });
    });
}

criterion_group!(
    benches,
    bench_initialize_gpt,
    bench_accept_payment,
    bench_specamt_inversion
);
criterion_main!(benches);
