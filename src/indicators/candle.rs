use crate::data::PriceSeries;

//bullish engulfing: a down candle followed by an up candle whose body
//fully engulfs the previous body
//the first bar has no predecessor and is always false
pub fn bullish_engulfing(series: &PriceSeries) -> Vec<bool> {
    let bars = series.bars();
    let mut out = Vec::with_capacity(bars.len());

    for i in 0..bars.len() {
        if i == 0 {
            out.push(false);
            continue;
        }

        let prev = &bars[i - 1];
        let curr = &bars[i];
        out.push(
            prev.close < prev.open
                && curr.close > curr.open
                && curr.close > prev.open
                && curr.open < prev.close,
        );
    }

    out
}

//bearish engulfing: the mirror pattern, an up candle swallowed by a
//down candle
pub fn bearish_engulfing(series: &PriceSeries) -> Vec<bool> {
    let bars = series.bars();
    let mut out = Vec::with_capacity(bars.len());

    for i in 0..bars.len() {
        if i == 0 {
            out.push(false);
            continue;
        }

        let prev = &bars[i - 1];
        let curr = &bars[i];
        out.push(
            prev.close > prev.open
                && curr.close < curr.open
                && curr.close < prev.open
                && curr.open > prev.close,
        );
    }

    out
}
