const MIN_REFRESH_SECS: u64 = 5;
// setInterval treats delays past i32::MAX ms as zero
const MAX_REFRESH_SECS: u64 = 86_400;

pub fn render_index(title: &str, refresh_secs: u64) -> String {
    INDEX_HTML
        .replace("{{TITLE}}", &escape_html(title))
        .replace("{{REFRESH_MS}}", &(refresh_secs.clamp(MIN_REFRESH_SECS, MAX_REFRESH_SECS) * 1000).to_string())
}

fn escape_html(value: &str) -> String {
    value
        .replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}

const INDEX_HTML: &str = r#"<!DOCTYPE html>
<html lang="en">
<head>
  <meta charset="UTF-8" />
  <meta name="viewport" content="width=device-width, initial-scale=1.0" />
  <title>{{TITLE}}</title>
  <style>
    @import url('https://fonts.googleapis.com/css2?family=Roboto:wght@400;500;700&display=swap');

    :root {
      --bg: #f4f6fb;
      --ink: #1f2430;
      --muted: #6b7280;
      --card: #ffffff;
      --border: rgba(31, 36, 48, 0.08);
      --accent: #3b82f6;
      --stool: #d97706;
      --urine: #eab308;
      --ideal: #9ca3af;
      --reference: #dc2626;
      --shadow: 0 12px 32px rgba(31, 36, 48, 0.08);
    }

    [data-theme="dark"] {
      --bg: #12151c;
      --ink: #e5e7eb;
      --muted: #9ca3af;
      --card: #1c212b;
      --border: rgba(229, 231, 235, 0.08);
      --shadow: 0 12px 32px rgba(0, 0, 0, 0.4);
    }

    * {
      box-sizing: border-box;
    }

    body {
      margin: 0;
      min-height: 100vh;
      background: var(--bg);
      color: var(--ink);
      font-family: "Roboto", "Helvetica Neue", sans-serif;
      padding: 24px 16px 48px;
      transition: background 200ms ease, color 200ms ease;
    }

    .app {
      width: min(1180px, 100%);
      margin: 0 auto;
      display: grid;
      gap: 20px;
    }

    header {
      display: flex;
      flex-wrap: wrap;
      align-items: center;
      justify-content: space-between;
      gap: 12px;
    }

    h1 {
      margin: 0;
      font-size: clamp(1.6rem, 3vw, 2.2rem);
    }

    .controls {
      display: flex;
      gap: 10px;
      align-items: center;
    }

    select, .toggle {
      font: inherit;
      color: var(--ink);
      background: var(--card);
      border: 1px solid var(--border);
      border-radius: 10px;
      padding: 8px 12px;
      box-shadow: var(--shadow);
    }

    .toggle {
      cursor: pointer;
    }

    .metrics {
      display: grid;
      grid-template-columns: repeat(auto-fit, minmax(150px, 1fr));
      gap: 14px;
    }

    .card {
      background: var(--card);
      border: 1px solid var(--border);
      border-radius: 16px;
      padding: 16px;
      box-shadow: var(--shadow);
    }

    .metric .label {
      display: block;
      font-size: 0.8rem;
      text-transform: uppercase;
      letter-spacing: 0.08em;
      color: var(--muted);
    }

    .metric .value {
      display: block;
      margin-top: 8px;
      font-size: 1.6rem;
      font-weight: 700;
    }

    .charts {
      display: grid;
      grid-template-columns: 7fr 5fr;
      gap: 14px;
    }

    .card h2 {
      margin: 0 0 4px;
      font-size: 1.1rem;
    }

    .card .description {
      margin: 0 0 12px;
      color: var(--muted);
      font-size: 0.9rem;
    }

    svg {
      width: 100%;
      height: 280px;
      display: block;
    }

    svg text {
      fill: var(--muted);
      font-size: 11px;
    }

    .grid-line {
      stroke: var(--border);
    }

    .line {
      fill: none;
      stroke: var(--accent);
      stroke-width: 3;
    }

    .point {
      fill: var(--card);
      stroke: var(--accent);
      stroke-width: 2;
    }

    .stool {
      fill: var(--stool);
    }

    .urine {
      fill: var(--urine);
    }

    .ideal {
      stroke: var(--ideal);
      stroke-width: 2;
      stroke-dasharray: 6 6;
      opacity: 0.6;
    }

    .reference {
      stroke: var(--reference);
      stroke-width: 2;
    }

    .bar {
      fill: var(--accent);
      opacity: 0.85;
    }

    table {
      width: 100%;
      border-collapse: collapse;
      font-size: 0.95rem;
    }

    th, td {
      text-align: left;
      padding: 8px 10px;
      border-bottom: 1px solid var(--border);
    }

    th {
      color: var(--muted);
      font-weight: 500;
    }

    .status {
      min-height: 1.2em;
      color: var(--muted);
      font-size: 0.9rem;
    }

    .status[data-type="error"] {
      color: var(--reference);
    }

    @media (max-width: 860px) {
      .charts {
        grid-template-columns: 1fr;
      }
    }
  </style>
</head>
<body>
  <main class="app">
    <header>
      <h1>{{TITLE}}</h1>
      <div class="controls">
        <select id="date-select" aria-label="Selected day"></select>
        <button class="toggle" id="theme-toggle" type="button">Dark mode</button>
      </div>
    </header>

    <section class="metrics">
      <div class="card metric"><span class="label">Today / ideal</span><span class="value" id="m-consumed">--</span></div>
      <div class="card metric"><span class="label">Meals today</span><span class="value" id="m-meals">--</span></div>
      <div class="card metric"><span class="label">Largest day</span><span class="value" id="m-largest">--</span></div>
      <div class="card metric"><span class="label">Last meal</span><span class="value" id="m-last-meal">--</span></div>
      <div class="card metric"><span class="label">Since last meal</span><span class="value" id="m-since-meal">--</span></div>
      <div class="card metric"><span class="label">In the diaper</span><span class="value" id="m-diaper">--</span></div>
      <div class="card metric"><span class="label">Suggested meal</span><span class="value" id="m-suggested">--</span></div>
      <div class="card metric"><span class="label">Since last stool</span><span class="value" id="m-since-stool">--</span></div>
    </section>

    <section class="charts">
      <div class="card">
        <h2 id="day-title">Selected day</h2>
        <p class="description">Cumulative formula consumed through the day.</p>
        <svg id="day-chart" viewBox="0 0 640 280" role="img" aria-label="Cumulative intake"></svg>
      </div>
      <div class="card">
        <h2>History</h2>
        <p class="description">Total formula consumed per day.</p>
        <svg id="history-chart" viewBox="0 0 480 280" role="img" aria-label="Daily totals"></svg>
      </div>
    </section>

    <section class="card">
      <table>
        <thead>
          <tr><th>Time</th><th>Bottle (ml)</th><th>Cumulative</th><th>Stool</th><th>Urine</th><th>Note</th></tr>
        </thead>
        <tbody id="events"></tbody>
      </table>
    </section>

    <div class="status" id="status"></div>
  </main>

  <script>
    const REFRESH_MS = {{REFRESH_MS}};
    const select = document.getElementById('date-select');
    const statusEl = document.getElementById('status');
    const themeToggle = document.getElementById('theme-toggle');
    const dayChart = document.getElementById('day-chart');
    const historyChart = document.getElementById('history-chart');
    const eventsEl = document.getElementById('events');

    let selectedDate = null;

    const setStatus = (message, type) => {
      statusEl.textContent = message;
      statusEl.dataset.type = type || '';
    };

    const setText = (id, value) => {
      document.getElementById(id).textContent = value;
    };

    const applyTheme = (theme) => {
      document.documentElement.dataset.theme = theme;
      themeToggle.textContent = theme === 'dark' ? 'Light mode' : 'Dark mode';
      localStorage.setItem('theme', theme);
    };

    const escapeText = (value) => String(value)
      .replace(/&/g, '&amp;')
      .replace(/</g, '&lt;')
      .replace(/>/g, '&gt;');

    const renderSummary = (s) => {
      setText('m-consumed', `${s.total_today} / ${s.ideal_now}`);
      setText('m-meals', s.meals_today);
      setText('m-largest', s.largest_daily_total);
      setText('m-last-meal', s.last_meal);
      setText('m-since-meal', s.time_since_last_meal.formatted);
      setText('m-diaper', `${s.urine_today} U / ${s.stool_today} A`);
      setText('m-suggested', `${s.suggested_next_meal} ml`);
      setText('m-since-stool', s.time_since_last_stool ? s.time_since_last_stool.formatted : '--');
    };

    const renderDates = (dates, selected) => {
      select.innerHTML = dates
        .map((date) => `<option value="${date}"${date === selected ? ' selected' : ''}>${date}</option>`)
        .join('');
      selectedDate = selected;
    };

    const renderDayChart = (data) => {
      const width = 640;
      const height = 280;
      const left = 44;
      const right = 16;
      const top = 16;
      const bottom = 30;
      const points = data.day.series.cumulative;
      const values = points.map((p) => p.value).concat(data.ideal_line.map((p) => p.value));
      if (data.reference_ml !== null) {
        values.push(data.reference_ml);
      }
      const max = Math.max(1, ...values);
      const x = (minute) => left + (minute / 1439) * (width - left - right);
      const y = (value) => height - bottom - (value / max) * (height - top - bottom);

      let svg = '';
      for (let i = 0; i <= 4; i += 1) {
        const value = (max * i) / 4;
        svg += `<line class="grid-line" x1="${left}" x2="${width - right}" y1="${y(value)}" y2="${y(value)}" />`;
        svg += `<text x="${left - 6}" y="${y(value) + 4}" text-anchor="end">${Math.round(value)}</text>`;
      }
      for (let hour = 0; hour <= 24; hour += 6) {
        svg += `<text x="${x(Math.min(hour * 60, 1439))}" y="${height - 10}" text-anchor="middle">${String(hour).padStart(2, '0')}:00</text>`;
      }

      const [start, end] = data.ideal_line;
      svg += `<line class="ideal" x1="${x(start.minute_of_day)}" y1="${y(start.value)}" x2="${x(end.minute_of_day)}" y2="${y(end.value)}" />`;
      if (data.reference_ml !== null) {
        svg += `<line class="reference" x1="${left}" x2="${width - right}" y1="${y(data.reference_ml)}" y2="${y(data.reference_ml)}" />`;
      }

      if (points.length) {
        const path = points
          .map((p, i) => `${i === 0 ? 'M' : 'L'} ${x(p.minute_of_day).toFixed(2)} ${y(p.value).toFixed(2)}`)
          .join(' ');
        svg += `<path class="line" d="${path}" />`;
        svg += points.map((p) => `<circle class="point" cx="${x(p.minute_of_day)}" cy="${y(p.value)}" r="4"><title>${p.time}: ${p.value} ml</title></circle>`).join('');
      }
      svg += data.day.series.stool.map((p) => {
        const cx = x(p.minute_of_day);
        const cy = y(p.value);
        return `<polygon class="stool" points="${cx},${cy - 9} ${cx + 9},${cy} ${cx},${cy + 9} ${cx - 9},${cy}"><title>Stool ${p.time}</title></polygon>`;
      }).join('');
      svg += data.day.series.urine.map((p) => `<circle class="urine" cx="${x(p.minute_of_day)}" cy="${y(p.value) - 12}" r="5"><title>Urine ${p.time}</title></circle>`).join('');

      dayChart.innerHTML = svg;
      setText('day-title', `Cumulative intake for ${data.day.date}`);
    };

    const renderHistoryChart = (bars) => {
      const width = 480;
      const height = 280;
      const left = 44;
      const bottom = 30;
      const top = 16;
      if (!bars.length) {
        historyChart.innerHTML = '<text x="50%" y="50%" text-anchor="middle">No data yet</text>';
        return;
      }
      const max = Math.max(1, ...bars.map((b) => b.total_ml));
      const slot = (width - left - 8) / bars.length;
      const y = (value) => height - bottom - (value / max) * (height - top - bottom);
      const labelEvery = Math.ceil(bars.length / 6);

      let svg = '';
      for (let i = 0; i <= 4; i += 1) {
        const value = (max * i) / 4;
        svg += `<line class="grid-line" x1="${left}" x2="${width - 8}" y1="${y(value)}" y2="${y(value)}" />`;
        svg += `<text x="${left - 6}" y="${y(value) + 4}" text-anchor="end">${Math.round(value)}</text>`;
      }
      bars.forEach((bar, i) => {
        const bx = left + i * slot + slot * 0.15;
        svg += `<rect class="bar" x="${bx}" y="${y(bar.total_ml)}" width="${slot * 0.7}" height="${height - bottom - y(bar.total_ml)}"><title>${bar.date}: ${bar.total_ml} ml</title></rect>`;
        if (i % labelEvery === 0) {
          svg += `<text x="${bx + slot * 0.35}" y="${height - 10}" text-anchor="middle">${bar.date.slice(0, 5)}</text>`;
        }
      });
      historyChart.innerHTML = svg;
    };

    const renderTable = (rows) => {
      eventsEl.innerHTML = rows
        .map((row) => `<tr><td>${row.time}</td><td>${row.volume_ml ?? ''}</td><td>${row.cumulative_ml}</td><td>${row.stool ? 'A' : ''}</td><td>${row.urine ? 'U' : ''}</td><td>${escapeText(row.note)}</td></tr>`)
        .join('');
    };

    const refresh = async () => {
      const query = selectedDate ? `?date=${encodeURIComponent(selectedDate)}` : '';
      const res = await fetch(`/api/dashboard${query}`);
      if (!res.ok) {
        const msg = await res.text();
        throw new Error(msg || 'Unable to load the feeding log');
      }
      const data = await res.json();
      renderDates(data.dates, data.selected);
      renderSummary(data.summary);
      renderDayChart(data);
      renderHistoryChart(data.history);
      renderTable(data.day.events);
      if (data.issues.length) {
        setStatus(`${data.issues.length} row(s) in the sheet need attention.`, 'info');
      } else {
        setStatus('', '');
      }
    };

    const reload = () => refresh().catch((err) => setStatus(err.message, 'error'));

    select.addEventListener('change', () => {
      selectedDate = select.value;
      reload();
    });

    themeToggle.addEventListener('click', () => {
      applyTheme(document.documentElement.dataset.theme === 'dark' ? 'light' : 'dark');
    });

    applyTheme(localStorage.getItem('theme') || 'light');
    reload();
    setInterval(reload, REFRESH_MS);
  </script>
</body>
</html>
"#;
