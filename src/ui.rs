use crate::models::{Day, MAX_SLEEP_HOURS, MAX_STRESS_LEVEL, MAX_WATER_LITERS};

pub fn render_index(default_stress: u8) -> String {
    let columns: String = Day::ALL
        .into_iter()
        .map(|day| render_day_column(day, default_stress))
        .collect();
    INDEX_HTML.replace("{{DAY_COLUMNS}}", &columns)
}

fn render_day_column(day: Day, default_stress: u8) -> String {
    let label = day.label();
    format!(
        r#"
        <div class="day" data-day="{label}">
          <h3>{label}</h3>
          <label>Meals
            <textarea data-field="meal_text" rows="4"></textarea>
          </label>
          <label>Water (L)
            <input data-field="water_liters" type="number" min="0" max="{MAX_WATER_LITERS:.1}" step="0.1" value="0.0" />
          </label>
          <label>Sleep (h)
            <input data-field="sleep_hours" type="number" min="0" max="{MAX_SLEEP_HOURS}" step="1" value="0" />
          </label>
          <label>Stress <output>{default_stress}</output>
            <input data-field="stress_level" type="range" min="0" max="{MAX_STRESS_LEVEL}" step="1" value="{default_stress}" />
          </label>
        </div>"#
    )
}

const INDEX_HTML: &str = r##"<!DOCTYPE html>
<html lang="en">
<head>
  <meta charset="UTF-8" />
  <meta name="viewport" content="width=device-width, initial-scale=1.0" />
  <title>Challenge Health Diary</title>
  <style>
    @import url('https://fonts.googleapis.com/css2?family=Space+Grotesk:wght@400;500;600&family=Fraunces:wght@600&display=swap');

    :root {
      --bg-1: #eef6ee;
      --bg-2: #bfe3c9;
      --ink: #23302a;
      --accent: #e8684a;
      --accent-2: #2f5848;
      --card: rgba(255, 255, 255, 0.88);
      --shadow: 0 24px 60px rgba(47, 88, 72, 0.18);
    }

    * {
      box-sizing: border-box;
    }

    body {
      margin: 0;
      min-height: 100vh;
      background: radial-gradient(circle at top, var(--bg-2), transparent 60%),
        linear-gradient(135deg, var(--bg-1), #e3f1e6 60%, #f4f9f4 100%);
      color: var(--ink);
      font-family: "Space Grotesk", "Trebuchet MS", sans-serif;
      display: grid;
      place-items: center;
      padding: 32px 18px 48px;
    }

    .app {
      width: min(1180px, 100%);
      background: var(--card);
      backdrop-filter: blur(12px);
      border-radius: 28px;
      box-shadow: var(--shadow);
      padding: 36px;
      display: grid;
      gap: 28px;
    }

    h1, h2 {
      font-family: "Fraunces", "Georgia", serif;
      font-weight: 600;
      margin: 0;
    }

    h1 {
      font-size: clamp(2rem, 4vw, 2.8rem);
    }

    h2 {
      font-size: 1.4rem;
    }

    h3 {
      margin: 0;
      font-size: 1rem;
      color: var(--accent-2);
    }

    label {
      display: grid;
      gap: 4px;
      font-size: 0.8rem;
      text-transform: uppercase;
      letter-spacing: 0.08em;
      color: #6b7a72;
    }

    input, textarea {
      font: inherit;
      font-size: 0.95rem;
      text-transform: none;
      letter-spacing: normal;
      color: var(--ink);
      border: 1px solid rgba(47, 88, 72, 0.18);
      border-radius: 10px;
      padding: 8px 10px;
      background: white;
      width: 100%;
    }

    input[type="range"] {
      padding: 0;
      accent-color: var(--accent);
    }

    .profile {
      display: grid;
      grid-template-columns: repeat(auto-fit, minmax(200px, 1fr));
      gap: 16px;
    }

    .week {
      display: grid;
      grid-template-columns: repeat(7, minmax(120px, 1fr));
      gap: 12px;
      overflow-x: auto;
    }

    .day {
      background: white;
      border-radius: 18px;
      padding: 14px;
      border: 1px solid rgba(47, 88, 72, 0.08);
      display: grid;
      gap: 10px;
      align-content: start;
    }

    .chart-card {
      background: white;
      border-radius: 20px;
      padding: 16px;
      border: 1px solid rgba(47, 88, 72, 0.08);
    }

    #chart {
      width: 100%;
      height: 260px;
      display: block;
    }

    #chart text {
      font-family: "Space Grotesk", "Trebuchet MS", sans-serif;
    }

    .chart-line {
      fill: none;
      stroke: var(--accent);
      stroke-width: 3;
    }

    .chart-point {
      fill: white;
      stroke: var(--accent);
      stroke-width: 2;
    }

    .chart-grid {
      stroke: rgba(47, 88, 72, 0.12);
    }

    .chart-label {
      fill: #6f7d75;
      font-size: 11px;
    }

    .notes {
      display: grid;
      grid-template-columns: repeat(auto-fit, minmax(260px, 1fr));
      gap: 16px;
    }

    .analysis {
      margin: 0;
      font-size: 1.05rem;
    }

    .analysis strong {
      color: var(--accent);
    }

    button {
      appearance: none;
      border: none;
      border-radius: 999px;
      padding: 16px 20px;
      font-size: 1rem;
      font-weight: 600;
      cursor: pointer;
      background: var(--accent-2);
      color: white;
      box-shadow: 0 10px 24px rgba(47, 88, 72, 0.3);
      justify-self: start;
    }

    button:active {
      transform: scale(0.98);
    }

    .export {
      display: flex;
      flex-wrap: wrap;
      align-items: center;
      gap: 16px;
    }

    label.inline {
      display: flex;
      align-items: center;
      gap: 8px;
    }

    label.inline input {
      width: auto;
    }

    .status {
      font-size: 0.95rem;
      color: #6b7a72;
      min-height: 1.2em;
    }

    .status[data-type="error"] {
      color: #c63b2b;
    }

    .status[data-type="ok"] {
      color: #2d7a4b;
    }

    .hint {
      margin: 0;
      color: #6f7d75;
      font-size: 0.9rem;
    }
  </style>
</head>
<body>
  <main class="app">
    <header>
      <h1>Challenge Health Diary</h1>
    </header>

    <section class="profile">
      <label>Name
        <input id="owner-name" type="text" autocomplete="off" />
      </label>
      <label>Week
        <input id="week-number" type="number" min="1" step="1" value="1" />
      </label>
    </section>

    <section>
      <h2 id="week-heading">Week 1 meal diary</h2>
    </section>
    <section class="week" id="week">
      {{DAY_COLUMNS}}
    </section>

    <section>
      <h2>Weekly stress levels</h2>
    </section>
    <div class="chart-card">
      <svg id="chart" viewBox="0 0 600 260" aria-label="Stress chart" role="img"></svg>
    </div>

    <section class="notes">
      <label>Health notes
        <textarea id="health-notes" rows="4"></textarea>
      </label>
      <label>Goals for this week
        <textarea id="goals" rows="4"></textarea>
      </label>
    </section>

    <section>
      <h2>Condition check</h2>
      <p class="analysis">Low sleep and high stress days: <strong id="poor-days">none</strong></p>
    </section>

    <section class="export">
      <label class="inline">
        <input id="include-vitals" type="checkbox" />
        Include sleep and stress
      </label>
      <button id="export-btn" type="button">Download data as CSV</button>
    </section>
    <div class="status" id="status"></div>
    <p class="hint" id="file-hint"></p>
  </main>

  <script>
    const statusEl = document.getElementById('status');
    const chartEl = document.getElementById('chart');
    const weekHeadingEl = document.getElementById('week-heading');
    const poorDaysEl = document.getElementById('poor-days');
    const fileHintEl = document.getElementById('file-hint');
    const ownerEl = document.getElementById('owner-name');
    const weekEl = document.getElementById('week-number');
    const notesEl = document.getElementById('health-notes');
    const goalsEl = document.getElementById('goals');
    const exportBtn = document.getElementById('export-btn');
    const vitalsEl = document.getElementById('include-vitals');

    let sessionId = null;
    let fileName = null;
    const pending = new Map();
    const inFlight = new Set();

    const setStatus = (message, type) => {
      statusEl.textContent = message;
      statusEl.dataset.type = type || '';
    };

    const renderLineChart = (points) => {
      const width = 600;
      const height = 260;
      const paddingX = 44;
      const paddingY = 34;
      const top = 24;
      const min = 0;
      const max = 10;

      const xStep = (width - paddingX * 2) / (points.length - 1);
      const scaleY = (height - top - paddingY) / (max - min);
      const x = (index) => paddingX + index * xStep;
      const y = (value) => height - paddingY - (value - min) * scaleY;

      const path = points
        .map((point, index) => `${index === 0 ? 'M' : 'L'} ${x(index).toFixed(2)} ${y(point.stress_level).toFixed(2)}`)
        .join(' ');

      let grid = '';
      for (let value = min; value <= max; value += 2) {
        const yPos = y(value);
        grid += `<line class="chart-grid" x1="${paddingX}" y1="${yPos}" x2="${width - paddingX}" y2="${yPos}" />`;
        grid += `<text class="chart-label" x="${paddingX - 10}" y="${yPos + 4}" text-anchor="end">${value}</text>`;
      }

      const xLabels = points
        .map((point, index) => `<text class="chart-label" x="${x(index)}" y="${height - paddingY + 18}" text-anchor="middle">${point.day}</text>`)
        .join('');

      const circles = points
        .map((point, index) => `<circle class="chart-point" cx="${x(index)}" cy="${y(point.stress_level)}" r="4" />`)
        .join('');

      chartEl.innerHTML = `
        ${grid}
        <path class="chart-line" d="${path}" />
        ${circles}
        ${xLabels}
      `;
    };

    const applyView = (view) => {
      sessionId = view.session_id;
      fileName = view.export_file_name;
      weekHeadingEl.textContent = `Week ${view.record.week_number} meal diary`;
      poorDaysEl.textContent = view.poor_condition_label;
      fileHintEl.textContent = `Export file: ${fileName}`;
      renderLineChart(view.chart);
    };

    const request = async (method, path, body) => {
      const res = await fetch(`/api/sessions/${sessionId}${path}`, {
        method,
        headers: { 'content-type': 'application/json' },
        body: body === undefined ? undefined : JSON.stringify(body)
      });
      if (res.status === 404) {
        throw new Error('Session expired, reload the page to start over');
      }
      if (!res.ok) {
        const msg = await res.text();
        throw new Error(msg || 'Request failed');
      }
      return res;
    };

    const send = (path, body) => {
      const promise = request('PUT', path, body)
        .then((res) => res.json())
        .then((view) => {
          applyView(view);
          setStatus('', '');
        });
      inFlight.add(promise);
      promise
        .catch((err) => setStatus(err.message, 'error'))
        .finally(() => inFlight.delete(promise));
      return promise;
    };

    // Edits are debounced per field; the timer fires the PUT.
    const save = (key, path, body) => {
      const queued = pending.get(key);
      if (queued) {
        clearTimeout(queued.timer);
      }
      const timer = setTimeout(() => {
        pending.delete(key);
        send(path, body);
      }, 250);
      pending.set(key, { timer, path, body });
    };

    // Sends every debounced edit now and waits for all outstanding PUTs.
    const flushPending = async () => {
      pending.forEach(({ timer, path, body }) => {
        clearTimeout(timer);
        send(path, body);
      });
      pending.clear();
      await Promise.all(Array.from(inFlight));
    };

    const fileNameFrom = (disposition) => {
      const match = /filename\*=UTF-8''([^;]+)/.exec(disposition || '');
      return match ? decodeURIComponent(match[1]) : null;
    };

    ownerEl.addEventListener('input', () => {
      save('profile', '/profile', { owner_name: ownerEl.value });
    });

    weekEl.addEventListener('input', () => {
      const week = parseInt(weekEl.value, 10);
      if (!Number.isNaN(week)) {
        save('week', '/profile', { week_number: week });
      }
    });

    notesEl.addEventListener('input', () => {
      save('notes', '/notes', { health_notes: notesEl.value });
    });

    goalsEl.addEventListener('input', () => {
      save('goals', '/notes', { goals: goalsEl.value });
    });

    document.querySelectorAll('.day').forEach((column) => {
      const day = column.dataset.day;
      column.querySelectorAll('[data-field]').forEach((input) => {
        const field = input.dataset.field;
        input.addEventListener('input', () => {
          let value = input.value;
          if (field === 'water_liters') {
            value = parseFloat(value);
          } else if (field !== 'meal_text') {
            value = parseInt(value, 10);
          }
          if (field === 'stress_level') {
            input.parentElement.querySelector('output').textContent = input.value;
          }
          if (typeof value === 'number' && Number.isNaN(value)) {
            return;
          }
          save(`${day}:${field}`, `/days/${day}`, { [field]: value });
        });
      });
    });

    exportBtn.addEventListener('click', async () => {
      try {
        await flushPending();
        const query = vitalsEl.checked ? '?vitals=true' : '';
        const res = await request('POST', `/export${query}`);
        const blob = await res.blob();
        const link = document.createElement('a');
        link.href = URL.createObjectURL(blob);
        link.download = fileNameFrom(res.headers.get('content-disposition')) || fileName;
        link.click();
        URL.revokeObjectURL(link.href);
        setStatus('Saved', 'ok');
        setTimeout(() => setStatus('', ''), 1200);
      } catch (err) {
        setStatus(err.message, 'error');
      }
    });

    const start = async () => {
      const res = await fetch('/api/sessions', { method: 'POST' });
      if (!res.ok) {
        throw new Error('Unable to start a diary session');
      }
      applyView(await res.json());
    };

    start().catch((err) => setStatus(err.message, 'error'));
  </script>
</body>
</html>
"##;
