//! Static questionnaire catalog.
//!
//! Every answer column persisted for a respondent has a fixed header taken verbatim from the
//! scoring table, so rows, rules, and feature schemas all agree on the same text. Items are
//! listed in persistence order within each section.

use std::collections::HashMap;
use std::sync::OnceLock;

use super::domain::{QuestionKey, Section, IDENTIFIER_HEADER, NAME_HEADER};

const VOCATIONAL: [&str; 6] = [
    "¿Cuál de las siguientes opciones define mejor la razón por la que usted eligió el actual programa de estudios?",
    "¿Qué tan bien conoce el plan de estudios del programa al cual ingresó?",
    "¿Con cuál de las siguientes afirmaciones está de acuerdo?",
    "¿Cuánto tiempo usualmente invierte por día para estudiar fuera del aula de clase?",
    "En general, ¿cómo calificaría su desempeño durante su trayectoria académica?",
    "Antes de iniciar este semestre, ¿cuánto tiempo estuvo desvinculado como estudiante de una Institución Educativa?",
];

const REASONING: [&str; 6] = [
    "Seleccione la respuesta correcta 1:",
    "Seleccione la respuesta correcta 2:",
    "Seleccione la respuesta correcta 3:",
    "Seleccione la respuesta correcta 4:",
    "Seleccione la respuesta correcta 5:",
    "Seleccione la respuesta correcta 6:",
];

const READING: [&str; 11] = [
    "¿Qué día iban a viajar los personajes de la historia?",
    "¿Con motivo de qué celebración iba a viajar esta pareja?",
    "¿Cuál era el nombre de la mujer que protagoniza la historia?",
    "¿Cuál era el nombre del hombre que protagoniza la historia?",
    "Inicialmente, ¿A qué país iban a viajar?",
    "¿Cuál era el nombre del agente de viajes?",
    "Finalmente, ¿A qué país terminaron viajando?",
    "Con relación a sus técnicas de estudio responda las siguientes preguntas:  [¿El lugar donde estudia cuenta con las condiciones adecuadas para estudiar? (iluminación, libre de ruido, suficiente espacio)]",
    "Con relación a sus técnicas de estudio responda las siguientes preguntas:  [¿Encuentra motivación en las diferentes actividades que realiza a nivel académico?]",
    "Con relación a sus técnicas de estudio responda las siguientes preguntas:  [¿Considera que las técnicas de estudio que utiliza son efectivas?]",
    "¿Le han diagnosticado alguna  dificultad de aprendizaje como dificultad para concentrarse, falta de atención, impulsividad, hiperactividad, dislexia o discalculia?",
];

const FAMILY: [&str; 19] = [
    "¿Cuenta con una red de apoyo  (familiares, amigos o adultos cercanos) que le brinden ayuda a nivel emocional, social, económica o de salud?",
    "¿Cómo definiría la relación con las personas que conviven con usted?",
    "De acuerdo a la relación que tiene con su familia, califique los siguientes aspectos: [Comunicación]",
    "De acuerdo a la relación que tiene con su familia, califique los siguientes aspectos: [Expresión de afecto entre los miembros de la familia]",
    "De acuerdo a la relación que tiene con su familia, califique los siguientes aspectos: [Afrontamiento de problemas familiares]",
    "De acuerdo a la relación que tiene con su familia, califique los siguientes aspectos: [Establecimiento de normas en el contexto familiar]",
    "De acuerdo a la relación que tiene con su familia, califique los siguientes aspectos: [Cercanía de los miembros de su familia]",
    "Elija la opción que mejor refleje su entorno familiar:",
    "¿Con qué frecuencia su familia realiza las siguientes acciones? [Cuando algo le preocupa, ¿puede pedir ayuda a su familia?]",
    "¿Con qué frecuencia su familia realiza las siguientes acciones? [Disfrutra el tiempo que comparte con su familia.]",
    "¿Con qué frecuencia su familia realiza las siguientes acciones? [Su familia lo acompaña en su vida universitaria.]",
    "¿Cómo gestiona los conflictos familiares con sus padres o personas con las que convive?  [Interrumpo constantemente a mis padres porque no estoy de acuerdo con lo que dicen]",
    "¿Cómo gestiona los conflictos familiares con sus padres o personas con las que convive?  [Intento cambiar de tema y evitar hablar de lo que ha pasado]",
    "¿Cómo gestiona los conflictos familiares con sus padres o personas con las que convive?  [Discuto con mis padres o tutores y me enfrento a ellos]",
    "¿Cómo gestiona los conflictos familiares con sus padres o personas con las que convive?  [Aporto soluciones para resolver el problema]",
    "¿Cómo gestiona los conflictos familiares con sus padres o personas con las que convive?  [Cuando nos enfadamos, incluso llegamos a la violencia física]",
    "¿Cómo gestiona los conflictos familiares con sus padres o personas con las que convive?  [Intento tratar el conflicto dialogando y escuchando a mis padres.]",
    "¿Actualmente en su familia se presentan algunas de las siguientes situaciones?",
    "¿Cuántos hijos tiene usted?",
];

const SOCIAL: [&str; 13] = [
    "Señale la frecuencia con la que le ocurre lo indicado en cada una de las siguientes afirmaciones: [En una conversación. Presta atención a la persona que le está hablando]",
    "Señale la frecuencia con la que le ocurre lo indicado en cada una de las siguientes afirmaciones: [Toma la iniciativa de darse a conocer a otras personas]",
    "Señale la frecuencia con la que le ocurre lo indicado en cada una de las siguientes afirmaciones: [Ayuda a que los demás se conozcan entre sí]",
    "Señale la frecuencia con la que le ocurre lo indicado en cada una de las siguientes afirmaciones: [Pide ayuda cuando tiene alguna dificultad]",
    "Señale la frecuencia con la que le ocurre lo indicado en cada una de las siguientes afirmaciones: [Se integra con facilidad a un grupo o  participa en actividades grupales]",
    "Señale la frecuencia con la que le ocurre lo indicado en cada una de las siguientes afirmaciones: [Pide disculpas a los demás por haber hecho algo mal]",
    "Señale la frecuencia con la que le ocurre lo indicado en cada una de las siguientes afirmaciones: [Reconoce cuando es necesario pedir permiso para hacer algo y lo solicita a la persona indicada]",
    "Señale la frecuencia con la que le ocurre lo indicado en cada una de las siguientes afirmaciones: [Presta ayuda a quien lo necesita]",
    "Señale la frecuencia con la que le ocurre lo indicado en cada una de las siguientes afirmaciones: [En una situación que le genera enojo, logra controlar esta emoción]",
    "Señale la frecuencia con la que le ocurre lo indicado en cada una de las siguientes afirmaciones: [Se mantiene al margen de situaciones que le pueden ocasionar problemas]",
    "Señale la frecuencia con la que le ocurre lo indicado en cada una de las siguientes afirmaciones: [Se cohibe de participar en actividades sociales por miedo a la critica o por verguenza]",
    "Señale la frecuencia con la que le ocurre lo indicado en cada una de las siguientes afirmaciones: [Antes de una conversación problemática, planifica la forma de exponer su punto de vista]",
    "Señale la frecuencia con la que le ocurre lo indicado en cada una de las siguientes afirmaciones: [En un contexto social, sino tiene claro el tema de conversación o surgen inquietudes alrededor del mismo, solicita explicación]",
];

const ECONOMIC: [&str; 35] = [
    "¿Con cuáles de los siguientes servicios públicos, privados o comunales cuenta la vivienda? [Energía eléctrica]",
    "¿Con cuáles de los siguientes servicios públicos, privados o comunales cuenta la vivienda? [Alcantarillado]",
    "¿Con cuáles de los siguientes servicios públicos, privados o comunales cuenta la vivienda? [Gas natural o propano]",
    "¿Con cuáles de los siguientes servicios públicos, privados o comunales cuenta la vivienda? [Recolección de basuras]",
    "¿Con cuáles de los siguientes servicios públicos, privados o comunales cuenta la vivienda? [Acueducto]",
    "¿Con cuáles de los siguientes servicios públicos, privados o comunales cuenta la vivienda? [Internet hogar]",
    "¿Con cuáles de los siguientes servicios públicos, privados o comunales cuenta la vivienda? [Plan de datos (celular)]",
    "La vivienda ocupada es:",
    "El agua para el consumo o preparación de alimentos la obtienen principalmente de:",
    "¿Qué tipo de sanitario utiliza en su hogar?",
    "¿Cuáles de los siguientes bienes posee este hogar? [Nevera o refrigerador]",
    "¿Cuáles de los siguientes bienes posee este hogar? [Máquina lavadora de ropa]",
    "¿Cuáles de los siguientes bienes posee este hogar? [Computador]",
    "¿Cuáles de los siguientes bienes posee este hogar? [Celular, tablet]",
    "¿Cuáles de los siguientes bienes posee este hogar? [Fogón o estufa]",
    "¿Cuáles de los siguientes bienes posee este hogar? [Televisión o equipo de sonido]",
    "¿Cuáles de los siguientes bienes posee este hogar? [Consola de videojuegos]",
    "Durante el tiempo que lleva habitando su vivienda, ¿ésta ha sido afectada por alguno de los siguientes eventos? [Inundaciones, crecientes, arroyos]",
    "Durante el tiempo que lleva habitando su vivienda, ¿ésta ha sido afectada por alguno de los siguientes eventos? [Avalanchas, derrumbes o deslizamientos]",
    "Durante el tiempo que lleva habitando su vivienda, ¿ésta ha sido afectada por alguno de los siguientes eventos? [Terremotos]",
    "Durante el tiempo que lleva habitando su vivienda, ¿ésta ha sido afectada por alguno de los siguientes eventos? [Incendios]",
    "Durante el tiempo que lleva habitando su vivienda, ¿ésta ha sido afectada por alguno de los siguientes eventos? [Hundimientos de terreno]",
    "Durante el tiempo que lleva habitando su vivienda, ¿ésta ha sido afectada por alguno de los siguientes eventos? [Desalojos]",
    "Durante el tiempo que lleva habitando su vivienda, ¿ésta ha sido afectada por alguno de los siguientes eventos? [Conflicto armado]",
    "Las vías de acceso vehicular a su vivienda son principalmente:",
    "Por enfermedad, accidente o nacimiento ¿tiene usted limitaciones permanentes para? [Ver]",
    "Por enfermedad, accidente o nacimiento ¿tiene usted limitaciones permanentes para? [Oír]",
    "Por enfermedad, accidente o nacimiento ¿tiene usted limitaciones permanentes para? [Hablar]",
    "Por enfermedad, accidente o nacimiento ¿tiene usted limitaciones permanentes para? [Moverse o caminar por sí mismo]",
    "Por enfermedad, accidente o nacimiento ¿tiene usted limitaciones permanentes para? [Bañarse, vestirse o alimentarse por sí mismo]",
    "Por enfermedad, accidente o nacimiento ¿tiene usted limitaciones permanentes para? [Dificultad para salir a la calle sin ayuda o compañía]",
    "Por enfermedad, accidente o nacimiento ¿tiene usted limitaciones permanentes para? [Entender o aprender]",
    "¿Usted es el responsable del cuidado de una persona que presenta una condición especial o adulto mayor?",
    "¿En qué rango se encuentra el ingreso mensual de la familia?",
    "¿Cuántas personas dependen del ingreso familiar?",
];

const COPING: [&str; 44] = [
    "Indique el grado de intensidad de estrés que le ha generado esa situación",
    "Indique el grado en que creía controlar este problema.",
    "Cuando ocurrió este problema: [¿Pensó en él como una amenaza?]",
    "Cuando ocurrió este problema: [¿Pensó en el como un reto?]",
    "Cuando ocurrió este problema: [¿Pensó en diferentes maneras de resolver el problema?]",
    "Cuando ocurrió este problema: [¿Decidió una forma de resolver el problema y la aplicó?]",
    "Lea atentamente cada una de las siguientes preguntas  y señale con qué frecuencia actúa  [¿Se decía a si mismo algo para sentirse mejor?]",
    "Lea atentamente cada una de las siguientes preguntas  y señale con qué frecuencia actúa  [¿Habló con algún familiar sobre el problema?]",
    "Lea atentamente cada una de las siguientes preguntas  y señale con qué frecuencia actúa  [¿Intentó olvidarlo todo?]",
    "Lea atentamente cada una de las siguientes preguntas  y señale con qué frecuencia actúa  [¿Intentó ayudar a otros a resolver un problema similar?]",
    "Lea atentamente cada una de las siguientes preguntas  y señale con qué frecuencia actúa  [¿Descargó su enfado sobre otras personas cuando se sentía triste o enfadado?]",
    "Lea atentamente cada una de las siguientes preguntas  y señale con qué frecuencia actúa  [¿Intentó distanciarse del problema y ser más objetivo?]",
    "Lea atentamente cada una de las siguientes preguntas  y señale con qué frecuencia actúa  [¿Se recordó a sí mismo que las cosas podían ser mucho peores?]",
    "Lea atentamente cada una de las siguientes preguntas  y señale con qué frecuencia actúa  [¿Habló con algún amigo sobre el problema?]",
    "Lea atentamente cada una de las siguientes preguntas  y señale con qué frecuencia actúa  [¿Se esforzó por resolver el problema?]",
    "Lea atentamente cada una de las siguientes preguntas  y señale con qué frecuencia actúa  [¿Intentó no pensar en el problema?]",
    "Lea atentamente cada una de las siguientes preguntas  y señale con qué frecuencia actúa  [¿Se dio cuenta de que no controlaba el problema?]",
    "Lea atentamente cada una de las siguientes preguntas  y señale con qué frecuencia actúa  [¿Empezó a hacer nuevas actividades?]",
    "Lea atentamente cada una de las siguientes preguntas  y señale con qué frecuencia actúa  [¿Se aventuro e hizo algo arriesgado?]",
    "Lea atentamente cada una de las siguientes preguntas  y señale con qué frecuencia actúa  [¿Pensó acerca de lo que tenía que hacer o decir en torno al problema?]",
    "Lea atentamente cada una de las siguientes preguntas  y señale con qué frecuencia actúa  [¿Intentó ver el lado positivo de la situación?]",
    "Lea atentamente cada una de las siguientes preguntas  y señale con qué frecuencia actúa  [¿Habló con algún profesional (por ejemplo, psicólogo, médico, abogado, sacerdote...)?]",
    "Lea atentamente cada una de las siguientes preguntas  y señale con qué frecuencia actúa  [¿Fantaseó o imagino mejores tiempos y situaciones que las que estaba viviendo?]",
    "Lea atentamente cada una de las siguientes preguntas  y señale con qué frecuencia actúa  [¿Creyó que el resultado sería decidido por el destino?]",
    "Lea atentamente cada una de las siguientes preguntas  y señale con qué frecuencia actúa  [¿Intentó hacer nuevos amigos?]",
    "Lea atentamente cada una de las siguientes preguntas  y señale con qué frecuencia actúa  [¿Se mantuvo apartado de la gente?]",
    "Lea atentamente cada una de las siguientes preguntas  y señale con qué frecuencia actúa  [¿Intentó prever cómo podrían cambiar las cosas?]",
    "Lea atentamente cada una de las siguientes preguntas  y señale con qué frecuencia actúa  [¿Pensó que estaba mejor que otras personas con el mismo problema que el suyo?]",
    "Lea atentamente cada una de las siguientes preguntas  y señale con qué frecuencia actúa  [¿Buscó la ayuda de otras personas o grupos con el mismo tipo de problema?]",
    "Lea atentamente cada una de las siguientes preguntas  y señale con qué frecuencia actúa  [¿Intentó resolver el problema al menos de dos formas diferentes?]",
    "Lea atentamente cada una de las siguientes preguntas  y señale con qué frecuencia actúa  [¿Intentó no pensar en su situación, aún sabiendo que tendría que hacerlo en otro momento?]",
    "Lea atentamente cada una de las siguientes preguntas  y señale con qué frecuencia actúa  [¿Aceptó el problema por que no se podía hacer algo para cambiarlo?]",
    "Lea atentamente cada una de las siguientes preguntas  y señale con qué frecuencia actúa  [¿Leyó con más frecuencia como forma de distracción?]",
    "Lea atentamente cada una de las siguientes preguntas  y señale con qué frecuencia actúa  [¿Gritó o lloró para desahogarse?]",
    "Lea atentamente cada una de las siguientes preguntas  y señale con qué frecuencia actúa  [¿Trató de dar algún sentido personal a la situación?]",
    "Lea atentamente cada una de las siguientes preguntas  y señale con qué frecuencia actúa  [¿Intentó decirse a sí mismo que las cosas mejorarían?]",
    "Lea atentamente cada una de las siguientes preguntas  y señale con qué frecuencia actúa  [¿Procuró informarse más sobre la situación?]",
    "Lea atentamente cada una de las siguientes preguntas  y señale con qué frecuencia actúa  [¿Intentó aprender a hacer más cosas por su cuenta?]",
    "Lea atentamente cada una de las siguientes preguntas  y señale con qué frecuencia actúa  [¿Deseó que el problema desapareciera o deseó acabar con él de algún modo?]",
    "Lea atentamente cada una de las siguientes preguntas  y señale con qué frecuencia actúa  [¿Esperó que se resolviera de la peor manera posible?]",
    "Lea atentamente cada una de las siguientes preguntas  y señale con qué frecuencia actúa  [¿Empleó mucho tiempo en actividades de recreo?]",
    "Lea atentamente cada una de las siguientes preguntas  y señale con qué frecuencia actúa  [¿Intentó anticipar las nuevas demandas que le podían pedir?]",
    "Lea atentamente cada una de las siguientes preguntas  y señale con qué frecuencia actúa  [¿Pensó en cómo está situación podía cambiar su vida para mejor?]",
    "Lea atentamente cada una de las siguientes preguntas  y señale con qué frecuencia actúa  [¿Rezó para guiarse o fortalecerse?]",
];

pub(crate) fn headers(section: Section) -> &'static [&'static str] {
    match section {
        Section::Vocational => &VOCATIONAL,
        Section::Reasoning => &REASONING,
        Section::Reading => &READING,
        Section::Family => &FAMILY,
        Section::Social => &SOCIAL,
        Section::Economic => &ECONOMIC,
        Section::Coping => &COPING,
    }
}

/// Every question in persistence order.
pub fn all_questions() -> impl Iterator<Item = QuestionKey> {
    Section::ALL.into_iter().flat_map(|section| {
        (1..=section.len()).filter_map(move |item| {
            u8::try_from(item)
                .ok()
                .and_then(|item| QuestionKey::new(section, item))
        })
    })
}

/// Resolve an exact column header back to its question.
pub fn resolve(header: &str) -> Option<QuestionKey> {
    static INDEX: OnceLock<HashMap<&'static str, QuestionKey>> = OnceLock::new();
    INDEX
        .get_or_init(|| {
            all_questions()
                .map(|question| (question.header(), question))
                .collect()
        })
        .get(header.trim())
        .copied()
}

/// The full stored row header: identity columns followed by every question.
pub fn column_headers() -> Vec<&'static str> {
    let mut columns = vec![NAME_HEADER, IDENTIFIER_HEADER];
    columns.extend(all_questions().map(|question| question.header()));
    columns
}
