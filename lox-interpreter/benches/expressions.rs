use criterion::{criterion_group, criterion_main, Criterion};
use lox_core::scan;
use lox_interpreter::{Diagnostics, Interpreter, Lox, Parser, RunOptions};
use std::io;

const SRC: &str = "
var a = 1;
var b = 2;
var s = \"str\";
{
    var a = a * 3 + b / 4 - (b - a) * 2;
    if (a > b and !(a == b) or nil) {
        s = s + \"ing\";
        print s;
    } else {
        print a;
    }
}
print a + b * (a - b) / 2 >= 0;
";

fn benchmark(c: &mut Criterion) {
    let scanned = scan(SRC);
    let parsed = Parser::new(&scanned.tokens).parse();
    let mut sink = io::sink();

    c.bench_function("scan", |b| b.iter(|| scan(SRC)));

    c.bench_function("parse", |b| {
        b.iter(|| Parser::new(&scanned.tokens).parse())
    });

    c.bench_function("interpret", |b| {
        b.iter(|| {
            let mut interpreter = Interpreter::new(&mut sink);
            interpreter.interpret(&parsed.statements).unwrap();
        })
    });

    c.bench_function("run", |b| {
        b.iter(|| {
            let mut diagnostics = Diagnostics::new();
            let mut lox = Lox::new(&mut sink, RunOptions::default());
            lox.run(SRC, &mut diagnostics);
        })
    });
}

criterion_group!(benches, benchmark);
criterion_main!(benches);
